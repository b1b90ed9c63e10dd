//! # User Item View
//!
//! One row of a forum's member list: avatar, name, role label and a
//! dropdown with the moderation actions the viewer is entitled to.

use crate::model::{ForumId, UserId, UserProfileWithRole};
use crate::moderation::{
    can_ban_user, moderation_action, should_show_add_admin_action, should_show_ban_action,
    user_type_label, ForumModerator, ModerationAction, TargetUser, Viewer,
};
use crate::photo::{PhotoLoader, PhotoSlot};

use super::dropdown::{DropdownGroup, DropdownHandle};

/// What the parent list knows about the forum and the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForumContext {
    /// Forum being shown
    pub forum_id: ForumId,
    /// The forum creator's user id; bans are keyed by it
    pub forum_creator_id: UserId,
    /// The signed-in user
    pub viewer: Viewer,
}

/// View-model for one member row.
pub struct UserItemView {
    user: UserProfileWithRole,
    context: ForumContext,
    moderator: ForumModerator,
    photo: PhotoSlot,
    dropdown: DropdownHandle,
}

impl UserItemView {
    /// Mount a row: register its dropdown in the list's group and load the
    /// member's photo if they have one.
    pub async fn mount(
        user: UserProfileWithRole,
        context: ForumContext,
        moderator: ForumModerator,
        photos: &PhotoLoader,
        dropdowns: &DropdownGroup,
    ) -> Self {
        let mut view = Self {
            user,
            context,
            moderator,
            photo: PhotoSlot::new(),
            dropdown: dropdowns.register(),
        };
        view.reload_photo(photos).await;
        view
    }

    /// (Re)load the member's photo. On failure the previous image stays.
    pub async fn reload_photo(&mut self, photos: &PhotoLoader) {
        let Some(photo_id) = self.user.profile_photo.map(|p| p.photo_id) else {
            return;
        };
        if let Ok(handle) = photos.load(photo_id).await {
            self.photo.install(handle);
        }
    }

    /// The member shown in this row.
    pub fn user(&self) -> &UserProfileWithRole {
        &self.user
    }

    /// Local address of the member's photo, if loaded.
    pub fn photo_url(&self) -> Option<String> {
        self.photo.current().map(|h| h.local_url())
    }

    /// The row's photo slot.
    pub fn photo(&self) -> &PhotoSlot {
        &self.photo
    }

    /// The row's dropdown.
    pub fn dropdown(&self) -> &DropdownHandle {
        &self.dropdown
    }

    fn target(&self) -> TargetUser {
        TargetUser::from(&self.user)
    }

    /// Label for the member's role.
    pub fn user_type_label(&self) -> &'static str {
        user_type_label(self.user.user_type.as_str())
    }

    /// Render the ban button at all.
    pub fn should_show_ban_button(&self) -> bool {
        should_show_ban_action(&self.context.viewer, &self.target())
    }

    /// Enable the ban button.
    pub fn can_ban_user(&self) -> bool {
        can_ban_user(&self.context.viewer, &self.target())
    }

    /// Both ban decisions.
    pub fn ban_action(&self) -> ModerationAction {
        moderation_action(&self.context.viewer, &self.target())
    }

    /// Render "promote to moderator".
    pub fn should_show_add_admin(&self) -> bool {
        should_show_add_admin_action(&self.context.viewer, &self.target())
    }

    /// Ban the member. Does nothing when the viewer may not.
    ///
    /// Returns whether the backend accepted the ban. Failures are already
    /// logged and published by the moderator.
    pub async fn ban_user(&self) -> bool {
        if !self.can_ban_user() {
            return false;
        }
        self.moderator
            .ban_user(
                &self.context.viewer,
                self.context.forum_creator_id,
                &self.target(),
            )
            .await
            .is_ok()
    }

    /// Promote the member. On success returns their id for the parent list
    /// to refresh.
    pub async fn add_admin(&self) -> Option<UserId> {
        self.moderator
            .add_admin(&self.context.viewer, self.context.forum_id, &self.target())
            .await
            .ok()
            .map(|()| self.user.user_id)
    }
}
