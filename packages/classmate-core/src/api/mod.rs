//! # Backend Service Interfaces
//!
//! Narrow async interfaces to the ClassMate REST services. View-models
//! depend only on these traits; [`HttpBackend`] implements all of them over
//! HTTP+JSON.
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────────────┐
//! │  UserItemView    │────►│ ForumApi, UserProfileApi  │
//! ├──────────────────┤     ├───────────────────────────┤
//! │  ProfilePageView │────►│ UserProfileApi, PostApi,  │
//! │                  │     │ NotificationPreferenceApi │
//! ├──────────────────┤     ├───────────────────────────┤
//! │  PostSearchView  │────►│ PostApi                   │
//! └──────────────────┘     └─────────────┬─────────────┘
//!                                        │
//!                                  HttpBackend (reqwest)
//! ```
//!
//! [`AuthApi`] has no view-model; the CLI uses it directly to obtain the
//! bearer token the other services expect.
//!
//! Every call is terminal on error: nothing here retries.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::model::{
    AuthRequest, Comment, CommentId, CommentUpdate, ForumId, PhotoId, Post, PostId,
    PreferenceSet, RegisterRequest, UserId, UserProfile,
};

/// Default page size for comment listings.
pub const DEFAULT_COMMENT_PAGE_SIZE: u32 = 10;

/// Account sign-up and sign-in.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account. Returns the email confirmation token.
    async fn register(&self, request: &RegisterRequest) -> Result<String>;

    /// Confirm an account with the token from the confirmation email.
    async fn confirm(&self, token: &str) -> Result<()>;

    /// Sign in. Returns the JWT for later requests.
    async fn authenticate(&self, request: &AuthRequest) -> Result<String>;
}

/// Forum membership operations.
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// Ban `target_user_id` from the forum owned by `forum_owner_id`,
    /// on behalf of `acting_user_id`.
    async fn ban_user(
        &self,
        forum_owner_id: UserId,
        acting_user_id: UserId,
        target_user_id: UserId,
    ) -> Result<()>;

    /// Promote a member to moderator.
    async fn add_admin(&self, forum_id: ForumId, user_id: UserId) -> Result<()>;
}

/// User profile lookups.
#[async_trait]
pub trait UserProfileApi: Send + Sync {
    /// Fetch a user's public profile.
    async fn get_user_profile(&self, user_id: UserId) -> Result<UserProfile>;

    /// Fetch raw image bytes for a profile photo.
    async fn get_user_profile_photo(&self, photo_id: PhotoId) -> Result<Bytes>;
}

/// Notification preference storage.
#[async_trait]
pub trait NotificationPreferenceApi: Send + Sync {
    /// Fetch the stored preferences.
    async fn get_user_preferences(&self, user_id: UserId) -> Result<PreferenceSet>;

    /// Replace the stored preferences.
    async fn update_user_preferences(
        &self,
        user_id: UserId,
        preferences: &PreferenceSet,
    ) -> Result<()>;
}

/// Post queries.
#[async_trait]
pub trait PostApi: Send + Sync {
    /// Posts written by a user.
    async fn get_posts_by_author(&self, user_id: UserId) -> Result<Vec<Post>>;

    /// Posts whose title matches `query`, across all forums.
    async fn get_posts_by_name(&self, query: &str) -> Result<Vec<Post>>;

    /// Posts whose title matches `query`, inside one forum.
    async fn get_posts_by_name_and_forum_id(
        &self,
        query: &str,
        forum_id: ForumId,
    ) -> Result<Vec<Post>>;
}

/// Comment operations.
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// Create a comment; returns it with its assigned id.
    async fn save_comment(&self, comment: &Comment) -> Result<Comment>;

    /// Fetch one comment.
    async fn get_comment(&self, id: CommentId) -> Result<Comment>;

    /// One page of a post's comments. Pages start at 0.
    async fn get_comments_by_post(&self, post_id: PostId, page: u32, size: u32)
        -> Result<Vec<Comment>>;

    /// Edit a comment's text.
    async fn update_comment(&self, id: CommentId, update: &CommentUpdate) -> Result<()>;

    /// Delete a comment. The backend checks `user_id` owns it.
    async fn delete_comment(&self, id: CommentId, user_id: UserId) -> Result<()>;
}
