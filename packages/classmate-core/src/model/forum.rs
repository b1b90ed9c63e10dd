//! Forum membership rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ProfilePhoto, UserId};

/// A member's role inside one forum.
///
/// Unknown strings from the backend are read as [`UserType::Subscriber`],
/// the least privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    /// Forum owner
    Creator,
    /// Moderator appointed by the creator
    Admin,
    /// Regular member
    #[default]
    Subscriber,
}

impl UserType {
    /// All roles, most privileged first.
    pub const ALL: [UserType; 3] = [UserType::Creator, UserType::Admin, UserType::Subscriber];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Creator => "Creator",
            UserType::Admin => "Admin",
            UserType::Subscriber => "Subscriber",
        }
    }
}

impl From<&str> for UserType {
    fn from(s: &str) -> Self {
        match s {
            "Creator" => UserType::Creator,
            "Admin" => UserType::Admin,
            _ => UserType::Subscriber,
        }
    }
}

impl From<String> for UserType {
    fn from(s: String) -> Self {
        UserType::from(s.as_str())
    }
}

impl From<UserType> for String {
    fn from(t: UserType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user listed in a forum, with their role in that forum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileWithRole {
    /// Member's user id
    pub user_id: UserId,
    /// First name
    pub name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Role inside the forum
    pub user_type: UserType,
    /// Avatar, when the member uploaded one
    #[serde(default)]
    pub profile_photo: Option<ProfilePhoto>,
}

impl UserProfileWithRole {
    /// "First Last", or just the first name when the last name is blank.
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.last_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_wire_names() {
        for t in UserType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_unknown_user_type_is_subscriber() {
        let t: UserType = serde_json::from_str("\"Owner\"").unwrap();
        assert_eq!(t, UserType::Subscriber);
        assert_eq!(UserType::from(""), UserType::Subscriber);
    }

    #[test]
    fn test_member_row_deserialization() {
        let json = r#"{
            "userId": 12,
            "name": "Lucía",
            "lastName": "Gómez",
            "userType": "Admin",
            "profilePhoto": { "photoId": 7 }
        }"#;
        let row: UserProfileWithRole = serde_json::from_str(json).unwrap();
        assert_eq!(row.user_id, 12);
        assert_eq!(row.user_type, UserType::Admin);
        assert_eq!(row.profile_photo, Some(ProfilePhoto { photo_id: 7 }));
        assert_eq!(row.full_name(), "Lucía Gómez");
    }

    #[test]
    fn test_member_row_without_photo() {
        let json = r#"{ "userId": 3, "name": "Ana", "userType": "Subscriber" }"#;
        let row: UserProfileWithRole = serde_json::from_str(json).unwrap();
        assert!(row.profile_photo.is_none());
        assert_eq!(row.full_name(), "Ana");
    }
}
