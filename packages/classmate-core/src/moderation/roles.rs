//! Membership role resolver.

use crate::model::{UserId, UserProfileWithRole, UserType};

/// The signed-in user looking at the member list.
///
/// Derived per render from the session and the forum being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// Signed-in user's id
    pub user_id: UserId,
    /// Viewer created this forum
    pub is_creator: bool,
    /// Viewer moderates this forum
    pub is_admin: bool,
}

impl Viewer {
    /// Viewer with the flags implied by their role in the forum.
    pub fn with_role(user_id: UserId, role: UserType) -> Self {
        Self {
            user_id,
            is_creator: role == UserType::Creator,
            is_admin: role == UserType::Admin,
        }
    }
}

/// The member an action would apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetUser {
    /// Member's user id
    pub user_id: UserId,
    /// Member's role in the forum
    pub user_type: UserType,
}

impl From<&UserProfileWithRole> for TargetUser {
    fn from(row: &UserProfileWithRole) -> Self {
        Self {
            user_id: row.user_id,
            user_type: row.user_type,
        }
    }
}

/// Visibility and enablement of one moderation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModerationAction {
    /// Render the control at all
    pub visible: bool,
    /// Allow activating it
    pub enabled: bool,
}

/// Creators and admins see the ban control; subscribers never do.
pub fn should_show_ban_action(viewer: &Viewer, _target: &TargetUser) -> bool {
    viewer.is_creator || viewer.is_admin
}

/// Creators may ban anyone. Admins may ban anyone but other admins.
///
/// A creator targeting themself is not rejected here.
pub fn can_ban_user(viewer: &Viewer, target: &TargetUser) -> bool {
    if viewer.is_creator {
        return true;
    }
    viewer.is_admin && target.user_type != UserType::Admin
}

/// Both ban decisions for one row.
pub fn moderation_action(viewer: &Viewer, target: &TargetUser) -> ModerationAction {
    ModerationAction {
        visible: should_show_ban_action(viewer, target),
        enabled: can_ban_user(viewer, target),
    }
}

/// Only the creator sees "promote to moderator", and only on subscribers.
pub fn should_show_add_admin_action(viewer: &Viewer, target: &TargetUser) -> bool {
    viewer.is_creator && target.user_type == UserType::Subscriber
}

/// Display label for a backend role name. Unknown names read as
/// subscribers.
pub fn user_type_label(user_type: &str) -> &'static str {
    match user_type {
        "Creator" => "Creador",
        "Admin" => "Moderador",
        _ => "Suscriptor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewers() -> Vec<Viewer> {
        let mut out = Vec::new();
        for is_creator in [false, true] {
            for is_admin in [false, true] {
                out.push(Viewer {
                    user_id: 1,
                    is_creator,
                    is_admin,
                });
            }
        }
        out
    }

    fn targets() -> Vec<TargetUser> {
        UserType::ALL
            .into_iter()
            .map(|user_type| TargetUser {
                user_id: 2,
                user_type,
            })
            .collect()
    }

    #[test]
    fn test_show_ban_iff_creator_or_admin() {
        for viewer in viewers() {
            for target in targets() {
                assert_eq!(
                    should_show_ban_action(&viewer, &target),
                    viewer.is_creator || viewer.is_admin,
                    "{viewer:?} / {target:?}"
                );
            }
        }
    }

    #[test]
    fn test_can_ban_matches_role_table() {
        for viewer in viewers() {
            for target in targets() {
                let expected = viewer.is_creator
                    || (viewer.is_admin && target.user_type != UserType::Admin);
                assert_eq!(can_ban_user(&viewer, &target), expected, "{viewer:?} / {target:?}");
            }
        }
    }

    #[test]
    fn test_subscriber_viewer_sees_nothing() {
        let viewer = Viewer::with_role(5, UserType::Subscriber);
        for target in targets() {
            assert_eq!(moderation_action(&viewer, &target), ModerationAction::default());
            assert!(!should_show_add_admin_action(&viewer, &target));
        }
    }

    #[test]
    fn test_admin_cannot_ban_admin_but_sees_button() {
        let viewer = Viewer::with_role(5, UserType::Admin);
        let target = TargetUser {
            user_id: 6,
            user_type: UserType::Admin,
        };
        assert_eq!(
            moderation_action(&viewer, &target),
            ModerationAction {
                visible: true,
                enabled: false
            }
        );
    }

    #[test]
    fn test_creator_may_target_self() {
        let viewer = Viewer::with_role(5, UserType::Creator);
        let target = TargetUser {
            user_id: 5,
            user_type: UserType::Creator,
        };
        assert!(can_ban_user(&viewer, &target));
    }

    #[test]
    fn test_add_admin_only_creator_on_subscriber() {
        let creator = Viewer::with_role(1, UserType::Creator);
        let admin = Viewer::with_role(1, UserType::Admin);
        for target in targets() {
            assert_eq!(
                should_show_add_admin_action(&creator, &target),
                target.user_type == UserType::Subscriber
            );
            assert!(!should_show_add_admin_action(&admin, &target));
        }
    }

    #[test]
    fn test_user_type_labels() {
        assert_eq!(user_type_label("Creator"), "Creador");
        assert_eq!(user_type_label("Admin"), "Moderador");
        assert_eq!(user_type_label("Subscriber"), "Suscriptor");
        assert_eq!(user_type_label("Banned"), "Suscriptor");
        assert_eq!(user_type_label(""), "Suscriptor");
    }
}
