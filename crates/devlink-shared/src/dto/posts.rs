use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/posts` and `PATCH /api/posts/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub text: String,
}

/// Body of comment create/edit requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

/// Query string of the feed listing endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AuthorResponse,
    pub text: String,
    pub likes: Vec<LikeResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post as listed in a feed: at most the newest comment, plus the real count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryResponse {
    pub id: Uuid,
    pub author: AuthorResponse,
    pub text: String,
    pub likes: Vec<LikeResponse>,
    pub comments: Vec<CommentResponse>,
    pub comments_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post fetched by id, with every comment. Carries no `commentsCount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub id: Uuid,
    pub author: AuthorResponse,
    pub text: String,
    pub likes: Vec<LikeResponse>,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of a listing. `total` is the count at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_ignores_server_owned_fields() {
        let body = r#"{
            "text": "Hello",
            "author": {"userId": "00000000-0000-0000-0000-000000000000", "name": "Mallory"},
            "likes": [{"userId": "00000000-0000-0000-0000-000000000000"}],
            "comments": []
        }"#;
        let request: PostRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.text, "Hello");
    }

    #[test]
    fn test_missing_text_deserializes_as_blank() {
        let request: CommentRequest = serde_json::from_str("{}").unwrap();
        assert!(request.text.is_empty());
    }

    #[test]
    fn test_summary_uses_camel_case() {
        let summary = PostSummaryResponse {
            id: Uuid::nil(),
            author: AuthorResponse {
                user_id: Uuid::nil(),
                name: "Ada".into(),
                avatar: None,
            },
            text: "Hello".into(),
            likes: vec![],
            comments: vec![],
            comments_count: 3,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["commentsCount"], 3);
        assert_eq!(json["author"]["userId"], Uuid::nil().to_string());
        assert!(json["author"].get("avatar").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
