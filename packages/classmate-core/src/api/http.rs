//! HTTP+JSON implementation of the backend service traits.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    AuthApi, CommentApi, ForumApi, NotificationPreferenceApi, PostApi, UserProfileApi,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::model::{
    AuthRequest, AuthResponse, Comment, CommentId, CommentUpdate, ForumId, PhotoId, Post,
    PostId, PreferenceSet, RegisterRequest, UserId, UserProfile,
};

/// Body of a ban request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BanRequest {
    requester_id: UserId,
    user_id: UserId,
}

/// Talks to the ClassMate gateway with `reqwest`.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpBackend {
    /// Build a backend from a validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("classmate-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "Dispatching request");
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and turn non-success statuses into errors.
    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), path, "Request failed");
        Err(Error::from_response(status.as_u16(), path, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.execute(self.request(Method::GET, path), path).await?;
        Ok(resp.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        self.execute(self.request(method, path).json(body), path)
            .await
    }
}

fn search_path(query: &str, forum_id: Option<ForumId>) -> String {
    let mut path = format!("/api/posts/search?name={}", urlencoding::encode(query));
    if let Some(forum_id) = forum_id {
        path.push_str(&format!("&forumId={}", forum_id));
    }
    path
}

#[async_trait]
impl AuthApi for HttpBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<String> {
        tracing::info!(email = %request.email, "Registering account");
        let resp = self
            .send_json(Method::POST, "/api/auth/register", request)
            .await?;
        Ok(resp.text().await?)
    }

    async fn confirm(&self, token: &str) -> Result<()> {
        let path = format!("/api/auth/confirm?token={}", urlencoding::encode(token));
        self.execute(self.request(Method::GET, &path), &path).await?;
        Ok(())
    }

    async fn authenticate(&self, request: &AuthRequest) -> Result<String> {
        tracing::info!(email = %request.email, "Signing in");
        let resp = self
            .send_json(Method::POST, "/api/auth/authenticate", request)
            .await?;
        let body: AuthResponse = resp.json().await?;
        Ok(body.token)
    }
}

#[async_trait]
impl ForumApi for HttpBackend {
    async fn ban_user(
        &self,
        forum_owner_id: UserId,
        acting_user_id: UserId,
        target_user_id: UserId,
    ) -> Result<()> {
        let path = format!("/api/forums/{}/ban", forum_owner_id);
        let body = BanRequest {
            requester_id: acting_user_id,
            user_id: target_user_id,
        };
        self.send_json(Method::POST, &path, &body).await?;
        Ok(())
    }

    async fn add_admin(&self, forum_id: ForumId, user_id: UserId) -> Result<()> {
        let path = format!("/api/forums/{}/admins/{}", forum_id, user_id);
        self.execute(self.request(Method::PUT, &path), &path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserProfileApi for HttpBackend {
    async fn get_user_profile(&self, user_id: UserId) -> Result<UserProfile> {
        self.get_json(&format!("/api/user-profiles/{}", user_id)).await
    }

    async fn get_user_profile_photo(&self, photo_id: PhotoId) -> Result<Bytes> {
        let path = format!("/api/user-profiles/photos/{}", photo_id);
        let resp = self.execute(self.request(Method::GET, &path), &path).await?;
        Ok(resp.bytes().await?)
    }
}

#[async_trait]
impl NotificationPreferenceApi for HttpBackend {
    async fn get_user_preferences(&self, user_id: UserId) -> Result<PreferenceSet> {
        self.get_json(&format!("/api/notification-preferences/{}", user_id))
            .await
    }

    async fn update_user_preferences(
        &self,
        user_id: UserId,
        preferences: &PreferenceSet,
    ) -> Result<()> {
        let path = format!("/api/notification-preferences/{}", user_id);
        self.send_json(Method::PUT, &path, preferences).await?;
        Ok(())
    }
}

#[async_trait]
impl PostApi for HttpBackend {
    async fn get_posts_by_author(&self, user_id: UserId) -> Result<Vec<Post>> {
        self.get_json(&format!("/api/posts/author/{}", user_id)).await
    }

    async fn get_posts_by_name(&self, query: &str) -> Result<Vec<Post>> {
        self.get_json(&search_path(query, None)).await
    }

    async fn get_posts_by_name_and_forum_id(
        &self,
        query: &str,
        forum_id: ForumId,
    ) -> Result<Vec<Post>> {
        self.get_json(&search_path(query, Some(forum_id))).await
    }
}

#[async_trait]
impl CommentApi for HttpBackend {
    async fn save_comment(&self, comment: &Comment) -> Result<Comment> {
        let resp = self
            .send_json(Method::POST, "/api/comments", comment)
            .await?;
        Ok(resp.json().await?)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Comment> {
        self.get_json(&format!("/api/comments/{}", id)).await
    }

    async fn get_comments_by_post(
        &self,
        post_id: PostId,
        page: u32,
        size: u32,
    ) -> Result<Vec<Comment>> {
        self.get_json(&format!(
            "/api/comments/post/{}?page={}&size={}",
            post_id, page, size
        ))
        .await
    }

    async fn update_comment(&self, id: CommentId, update: &CommentUpdate) -> Result<()> {
        let path = format!("/api/comments/{}", id);
        self.send_json(Method::PUT, &path, update).await?;
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId, user_id: UserId) -> Result<()> {
        let path = format!("/api/comments/{}?userId={}", id, user_id);
        self.execute(self.request(Method::DELETE, &path), &path)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_encodes_query() {
        assert_eq!(
            search_path("álgebra lineal", None),
            "/api/posts/search?name=%C3%A1lgebra%20lineal"
        );
        assert_eq!(
            search_path("tp", Some(5)),
            "/api/posts/search?name=tp&forumId=5"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ClientConfig::default().with_base_url("ftp://nope");
        assert!(matches!(
            HttpBackend::new(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_ban_request_body() {
        let body = BanRequest {
            requester_id: 2,
            user_id: 9,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "requesterId": 2, "userId": 9 }));
    }
}
