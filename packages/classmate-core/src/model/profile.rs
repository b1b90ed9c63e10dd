//! # User Profile
//!
//! Public profile of a user as served by the user-profile service.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  UserProfile                                                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  user_id        backend id                                      │
//! │  name           first name (required)                           │
//! │  last_name      last name                                       │
//! │  email          optional, only served to the owner              │
//! │  description    optional free text                              │
//! │  profile_photo  optional { photo_id } → photo bytes endpoint    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use super::{PhotoId, UserId};

/// Reference to a stored profile photo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhoto {
    /// Id passed to the photo endpoint
    pub photo_id: PhotoId,
}

/// User profile information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Profile owner's id
    pub user_id: UserId,
    /// First name
    pub name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Avatar reference
    #[serde(default)]
    pub profile_photo: Option<ProfilePhoto>,
}

impl UserProfile {
    /// Photo id to load, if the user has one.
    pub fn photo_id(&self) -> Option<PhotoId> {
        self.profile_photo.map(|p| p.photo_id)
    }
}

// ============================================================================
// TESTS
// ============================================================================
