//! # Client Events
//!
//! Events published by the view-models for the host UI and for
//! diagnostics. Failures that view-models swallow at their boundary are
//! published here as [`ClientEvent::OperationFailed`].

use tokio::sync::broadcast;

use crate::error::Error;
use crate::model::{ForumId, PhotoId, PreferenceSet, UserId};

/// Events emitted by the client core
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A ban request succeeded
    UserBanned {
        /// Forum owner the ban was keyed by
        forum_owner_id: UserId,
        /// Who issued the ban
        acting_user_id: UserId,
        /// Who was banned
        target_user_id: UserId,
    },

    /// A member was promoted to moderator
    AdminAdded {
        /// Forum id
        forum_id: ForumId,
        /// Promoted member
        user_id: UserId,
    },

    /// A debounced preference flush reached the backend
    PreferencesSaved {
        /// Owner of the preferences
        user_id: UserId,
        /// The set that was sent
        preferences: PreferenceSet,
    },

    /// A photo finished loading
    PhotoLoaded {
        /// Photo id
        photo_id: PhotoId,
        /// Size of the image data
        size: usize,
    },

    /// A remote call failed and was swallowed by the caller
    OperationFailed {
        /// Short operation name, e.g. `ban_user`
        operation: &'static str,
        /// The failure
        error: Error,
    },
}

/// Broadcast channel for [`ClientEvent`]s.
///
/// Cloning the bus shares the channel. Publishing with no subscribers is
/// not an error.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    /// Create a bus holding up to `capacity` undelivered events per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    /// Publish an event.
    pub fn emit(&self, event: ClientEvent) {
        // Err only means nobody is listening
        let _ = self.tx.send(event);
    }

    /// Log a swallowed failure and publish it.
    pub fn report_failure(&self, operation: &'static str, error: Error) {
        tracing::error!(operation, code = error.code(), "{}", error);
        self.emit(ClientEvent::OperationFailed { operation, error });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EVENT_CAPACITY)
    }
}
