//! In-memory backend used by unit tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::api::{CommentApi, ForumApi, NotificationPreferenceApi, PostApi, UserProfileApi};
use crate::error::{Error, Result};
use crate::model::{
    Comment, CommentId, CommentUpdate, ForumId, PhotoId, Post, PostId, PreferenceSet,
    ProfilePhoto, UserId, UserProfile,
};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BanUser(UserId, UserId, UserId),
    AddAdmin(ForumId, UserId),
    GetProfile(UserId),
    GetPhoto(PhotoId),
    GetPreferences(UserId),
    UpdatePreferences(UserId, PreferenceSet),
    PostsByAuthor(UserId),
    PostsByName(String),
    PostsByNameAndForum(String, ForumId),
    SaveComment(PostId),
    GetComment(CommentId),
    CommentsByPost(PostId, u32, u32),
    UpdateComment(CommentId),
    DeleteComment(CommentId, UserId),
}

#[derive(Default)]
struct State {
    profiles: HashMap<UserId, UserProfile>,
    photos: HashMap<PhotoId, Bytes>,
    preferences: HashMap<UserId, PreferenceSet>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    failing: HashSet<&'static str>,
    profile_delays: HashMap<UserId, Duration>,
    search_delays: HashMap<String, Duration>,
    preference_fetch_delay: Option<Duration>,
    preference_update_delay: Option<Duration>,
    photo_delays: HashMap<PhotoId, Duration>,
    calls: Vec<Call>,
}

/// Fake backend implementing every service trait.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, user_id: UserId, photo_id: Option<PhotoId>) -> Self {
        self.state.lock().profiles.insert(
            user_id,
            UserProfile {
                user_id,
                name: format!("User{}", user_id),
                last_name: String::new(),
                email: None,
                description: None,
                profile_photo: photo_id.map(|photo_id| ProfilePhoto { photo_id }),
            },
        );
        self
    }

    pub fn with_photo(self, photo_id: PhotoId, data: &'static [u8]) -> Self {
        self.state
            .lock()
            .photos
            .insert(photo_id, Bytes::from_static(data));
        self
    }

    pub fn with_preferences(self, user_id: UserId, prefs: PreferenceSet) -> Self {
        self.state.lock().preferences.insert(user_id, prefs);
        self
    }

    pub fn with_post(self, id: PostId, title: &str, author_id: UserId, forum_id: ForumId) -> Self {
        self.state.lock().posts.push(Post {
            id,
            title: title.to_string(),
            content: String::new(),
            author_id,
            forum_id,
            upvotes: 0,
            downvotes: 0,
            comment_count: 0,
            created_at: None,
        });
        self
    }

    /// Make every call of `operation` fail with a connection error.
    pub fn failing(self, operation: &'static str) -> Self {
        self.state.lock().failing.insert(operation);
        self
    }

    pub fn with_profile_delay(self, user_id: UserId, delay: Duration) -> Self {
        self.state.lock().profile_delays.insert(user_id, delay);
        self
    }

    pub fn with_search_delay(self, query: &str, delay: Duration) -> Self {
        self.state
            .lock()
            .search_delays
            .insert(query.to_string(), delay);
        self
    }

    pub fn with_preference_fetch_delay(self, delay: Duration) -> Self {
        self.state.lock().preference_fetch_delay = Some(delay);
        self
    }

    pub fn with_preference_update_delay(self, delay: Duration) -> Self {
        self.state.lock().preference_update_delay = Some(delay);
        self
    }

    pub fn with_photo_delay(self, photo_id: PhotoId, delay: Duration) -> Self {
        self.state.lock().photo_delays.insert(photo_id, delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn preference_updates(&self) -> Vec<PreferenceSet> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::UpdatePreferences(_, prefs) => Some(prefs),
                _ => None,
            })
            .collect()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        if state.failing.contains(operation) {
            return Err(Error::ConnectionFailed(format!("{} unavailable", operation)));
        }
        Ok(())
    }

    async fn pause(delay: Option<Duration>) {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ForumApi for FakeBackend {
    async fn ban_user(&self, owner: UserId, actor: UserId, target: UserId) -> Result<()> {
        self.record("ban_user", Call::BanUser(owner, actor, target))
    }

    async fn add_admin(&self, forum_id: ForumId, user_id: UserId) -> Result<()> {
        self.record("add_admin", Call::AddAdmin(forum_id, user_id))
    }
}

#[async_trait]
impl UserProfileApi for FakeBackend {
    async fn get_user_profile(&self, user_id: UserId) -> Result<UserProfile> {
        self.record("get_user_profile", Call::GetProfile(user_id))?;
        let delay = self.state.lock().profile_delays.get(&user_id).copied();
        Self::pause(delay).await;
        self.state
            .lock()
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))
    }

    async fn get_user_profile_photo(&self, photo_id: PhotoId) -> Result<Bytes> {
        self.record("get_user_profile_photo", Call::GetPhoto(photo_id))?;
        let delay = self.state.lock().photo_delays.get(&photo_id).copied();
        Self::pause(delay).await;
        self.state
            .lock()
            .photos
            .get(&photo_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("photo {}", photo_id)))
    }
}

#[async_trait]
impl NotificationPreferenceApi for FakeBackend {
    async fn get_user_preferences(&self, user_id: UserId) -> Result<PreferenceSet> {
        // Read before the delay, like a server answering with what it had
        let (stored, delay) = {
            let state = self.state.lock();
            let stored = state.preferences.get(&user_id).copied().unwrap_or_default();
            (stored, state.preference_fetch_delay)
        };
        Self::pause(delay).await;
        self.record("get_user_preferences", Call::GetPreferences(user_id))?;
        Ok(stored)
    }

    async fn update_user_preferences(&self, user_id: UserId, prefs: &PreferenceSet) -> Result<()> {
        self.record(
            "update_user_preferences",
            Call::UpdatePreferences(user_id, *prefs),
        )?;
        let delay = self.state.lock().preference_update_delay;
        Self::pause(delay).await;
        self.state.lock().preferences.insert(user_id, *prefs);
        Ok(())
    }
}

#[async_trait]
impl PostApi for FakeBackend {
    async fn get_posts_by_author(&self, user_id: UserId) -> Result<Vec<Post>> {
        self.record("get_posts_by_author", Call::PostsByAuthor(user_id))?;
        let delay = self.state.lock().profile_delays.get(&user_id).copied();
        Self::pause(delay).await;
        Ok(self
            .state
            .lock()
            .posts
            .iter()
            .filter(|p| p.author_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_posts_by_name(&self, query: &str) -> Result<Vec<Post>> {
        self.record("get_posts_by_name", Call::PostsByName(query.to_string()))?;
        let delay = self.state.lock().search_delays.get(query).copied();
        Self::pause(delay).await;
        Ok(self
            .state
            .lock()
            .posts
            .iter()
            .filter(|p| p.title.contains(query))
            .cloned()
            .collect())
    }

    async fn get_posts_by_name_and_forum_id(
        &self,
        query: &str,
        forum_id: ForumId,
    ) -> Result<Vec<Post>> {
        self.record(
            "get_posts_by_name_and_forum_id",
            Call::PostsByNameAndForum(query.to_string(), forum_id),
        )?;
        let delay = self.state.lock().search_delays.get(query).copied();
        Self::pause(delay).await;
        Ok(self
            .state
            .lock()
            .posts
            .iter()
            .filter(|p| p.forum_id == forum_id && p.title.contains(query))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentApi for FakeBackend {
    async fn save_comment(&self, comment: &Comment) -> Result<Comment> {
        self.record("save_comment", Call::SaveComment(comment.post_id))?;
        let mut state = self.state.lock();
        let mut saved = comment.clone();
        saved.id = Some(state.comments.len() as CommentId + 1);
        state.comments.push(saved.clone());
        Ok(saved)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Comment> {
        self.record("get_comment", Call::GetComment(id))?;
        self.state
            .lock()
            .comments
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("comment {}", id)))
    }

    async fn get_comments_by_post(
        &self,
        post_id: PostId,
        page: u32,
        size: u32,
    ) -> Result<Vec<Comment>> {
        self.record("get_comments_by_post", Call::CommentsByPost(post_id, page, size))?;
        Ok(self
            .state
            .lock()
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .skip((page * size) as usize)
            .take(size as usize)
            .cloned()
            .collect())
    }

    async fn update_comment(&self, id: CommentId, update: &CommentUpdate) -> Result<()> {
        self.record("update_comment", Call::UpdateComment(id))?;
        let mut state = self.state.lock();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == Some(id))
            .ok_or_else(|| Error::NotFound(format!("comment {}", id)))?;
        comment.content = update.content.clone();
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId, user_id: UserId) -> Result<()> {
        self.record("delete_comment", Call::DeleteComment(id, user_id))?;
        self.state.lock().comments.retain(|c| c.id != Some(id));
        Ok(())
    }
}
