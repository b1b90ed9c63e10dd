//! # Forum Moderation
//!
//! Role-based moderation for a forum's member list.
//!
//! ## Who may do what
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────┐
//! │ Viewer       │ Ban button                                           │
//! ├──────────────┼──────────────────────────────────────────────────────┤
//! │ Creator      │ shown, enabled for every target                      │
//! │ Admin        │ shown, enabled unless the target is another Admin    │
//! │ Subscriber   │ hidden                                               │
//! └──────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Only the creator may promote subscribers to moderator.
//!
//! The resolver in [`roles`] is pure and recomputed on every render;
//! [`ForumModerator`] performs the resulting remote actions.

mod actions;
mod roles;

pub use actions::ForumModerator;
pub use roles::{
    can_ban_user, moderation_action, should_show_add_admin_action, should_show_ban_action,
    user_type_label, ModerationAction, TargetUser, Viewer,
};
