//! # Data Transfer Objects
//!
//! Wire shapes exchanged with the ClassMate REST services. All bodies are
//! JSON with camelCase field names.

mod auth;
mod forum;
mod post;
mod preferences;
mod profile;

pub use auth::{AuthRequest, AuthResponse, RegisterRequest};
pub use forum::{UserProfileWithRole, UserType};
pub use post::{Comment, CommentUpdate, Post};
pub use preferences::{PreferenceKind, PreferenceSet};
pub use profile::{ProfilePhoto, UserProfile};

/// Backend user identifier.
pub type UserId = i64;
/// Backend forum identifier.
pub type ForumId = i64;
/// Backend photo identifier.
pub type PhotoId = i64;
/// Backend post identifier.
pub type PostId = i64;
/// Backend comment identifier.
pub type CommentId = i64;
