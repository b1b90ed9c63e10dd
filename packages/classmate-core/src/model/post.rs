//! Posts and comments.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{CommentId, ForumId, PostId, UserId};

/// A forum post as returned by the post service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post id
    pub id: PostId,
    /// Title
    pub title: String,
    /// Body
    #[serde(default)]
    pub content: String,
    /// Author's user id
    pub author_id: UserId,
    /// Forum the post lives in
    pub forum_id: ForumId,
    /// Up votes
    #[serde(default)]
    pub upvotes: i64,
    /// Down votes
    #[serde(default)]
    pub downvotes: i64,
    /// Number of comments, maintained by the comment service
    #[serde(default)]
    pub comment_count: i64,
    /// Creation time (server local)
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Assigned by the backend on save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CommentId>,
    /// Post being commented on
    pub post_id: PostId,
    /// Commenter's user id
    pub author_id: UserId,
    /// Comment text
    pub content: String,
    /// Creation time (server local)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Comment {
    /// New, unsaved comment.
    pub fn new(post_id: PostId, author_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: None,
            post_id,
            author_id,
            content: content.into(),
            created_at: None,
        }
    }
}

/// Editable part of a comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdate {
    /// Replacement text
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_deserialization() {
        let json = r#"{
            "id": 9,
            "title": "Parcial de Física",
            "content": "¿Alguien tiene el resumen?",
            "authorId": 4,
            "forumId": 2,
            "upvotes": 3,
            "commentCount": 1,
            "createdAt": "2024-05-20T18:30:00"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 9);
        assert_eq!(post.forum_id, 2);
        assert_eq!(post.downvotes, 0);
        assert!(post.created_at.is_some());
    }

    #[test]
    fn test_new_comment_omits_server_fields() {
        let comment = Comment::new(9, 4, "Sí, te lo paso");
        let json = serde_json::to_value(&comment).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
        assert_eq!(json["postId"], 9);
        assert_eq!(json["authorId"], 4);
    }
}
