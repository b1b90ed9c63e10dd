//! Notification preferences.

use serde::{Deserialize, Serialize};

/// Which notifications a user wants to receive.
///
/// Every flag defaults to `false` until the stored set is loaded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    /// New comment on one of the user's posts
    pub comment_notification_enabled: bool,
    /// Like on one of the user's posts or comments
    pub like_notification_enabled: bool,
    /// Direct message
    pub message_notification_enabled: bool,
    /// Calendar events in subscribed forums
    pub event_notification_enabled: bool,
}

/// One flag of a [`PreferenceSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKind {
    /// `comment_notification_enabled`
    Comment,
    /// `like_notification_enabled`
    Like,
    /// `message_notification_enabled`
    Message,
    /// `event_notification_enabled`
    Event,
}

impl PreferenceKind {
    /// All flags.
    pub const ALL: [PreferenceKind; 4] = [
        PreferenceKind::Comment,
        PreferenceKind::Like,
        PreferenceKind::Message,
        PreferenceKind::Event,
    ];
}

impl PreferenceSet {
    /// Read one flag.
    pub fn get(&self, kind: PreferenceKind) -> bool {
        match kind {
            PreferenceKind::Comment => self.comment_notification_enabled,
            PreferenceKind::Like => self.like_notification_enabled,
            PreferenceKind::Message => self.message_notification_enabled,
            PreferenceKind::Event => self.event_notification_enabled,
        }
    }

    /// Write one flag.
    pub fn set(&mut self, kind: PreferenceKind, enabled: bool) {
        let flag = match kind {
            PreferenceKind::Comment => &mut self.comment_notification_enabled,
            PreferenceKind::Like => &mut self.like_notification_enabled,
            PreferenceKind::Message => &mut self.message_notification_enabled,
            PreferenceKind::Event => &mut self.event_notification_enabled,
        };
        *flag = enabled;
    }
}
