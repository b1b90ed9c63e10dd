//! Remote moderation actions.

use std::sync::Arc;

use super::roles::{can_ban_user, should_show_add_admin_action, TargetUser, Viewer};
use crate::api::ForumApi;
use crate::error::{Error, Result};
use crate::events::{ClientEvent, EventBus};
use crate::model::{ForumId, UserId};

/// Issues ban and promote requests on behalf of a viewer.
///
/// Each action is a single request. Success changes no local state; the
/// member list refreshes itself on the published event. Failures are
/// returned and also logged and published.
#[derive(Clone)]
pub struct ForumModerator {
    forum: Arc<dyn ForumApi>,
    events: EventBus,
}

impl ForumModerator {
    /// Create a moderator over the given forum service.
    pub fn new(forum: Arc<dyn ForumApi>, events: EventBus) -> Self {
        Self { forum, events }
    }

    /// Ban `target` from the forum owned by `forum_owner_id`.
    ///
    /// No request is sent when [`can_ban_user`] denies it.
    pub async fn ban_user(
        &self,
        viewer: &Viewer,
        forum_owner_id: UserId,
        target: &TargetUser,
    ) -> Result<()> {
        if !can_ban_user(viewer, target) {
            tracing::debug!(
                viewer = viewer.user_id,
                target = target.user_id,
                "Ban not permitted for viewer"
            );
            return Err(Error::NotPermitted(format!(
                "user {} cannot ban user {}",
                viewer.user_id, target.user_id
            )));
        }

        match self
            .forum
            .ban_user(forum_owner_id, viewer.user_id, target.user_id)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    forum_owner_id,
                    acting_user_id = viewer.user_id,
                    target_user_id = target.user_id,
                    "User banned"
                );
                self.events.emit(ClientEvent::UserBanned {
                    forum_owner_id,
                    acting_user_id: viewer.user_id,
                    target_user_id: target.user_id,
                });
                Ok(())
            }
            Err(e) => {
                self.events.report_failure("ban_user", e.clone());
                Err(e)
            }
        }
    }

    /// Promote `target` to moderator of `forum_id`.
    ///
    /// Only the creator may promote, and only subscribers.
    pub async fn add_admin(
        &self,
        viewer: &Viewer,
        forum_id: ForumId,
        target: &TargetUser,
    ) -> Result<()> {
        if !should_show_add_admin_action(viewer, target) {
            return Err(Error::NotPermitted(format!(
                "user {} cannot promote user {}",
                viewer.user_id, target.user_id
            )));
        }

        match self.forum.add_admin(forum_id, target.user_id).await {
            Ok(()) => {
                tracing::info!(forum_id, user_id = target.user_id, "Moderator added");
                self.events.emit(ClientEvent::AdminAdded {
                    forum_id,
                    user_id: target.user_id,
                });
                Ok(())
            }
            Err(e) => {
                self.events.report_failure("add_admin", e.clone());
                Err(e)
            }
        }
    }
}
