//! Read models for posts.
//!
//! Lists always go through [`FeedProjection::summarize`], single-post fetches
//! through [`FeedProjection::detail`]. A summary carries `comments_count`; a
//! detail never does, which is how callers tell the two apart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Author, Comment, Likes, Post};
use crate::error::DomainError;
use crate::ports::EntityStore;

/// Feed representation of a post: only the newest comment, plus the true
/// comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    pub likes: Likes,
    /// At most one element.
    pub comments: Vec<Comment>,
    pub comments_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostSummary {
    /// `comments` are the post's resolved comments, newest first. The count
    /// is theirs, so a summary never claims more than a detail would show.
    pub fn new(post: &Post, comments: Vec<Comment>) -> Self {
        let comments_count = comments.len();
        Self {
            id: post.id,
            author: post.author.clone(),
            text: post.text.clone(),
            likes: post.likes.clone(),
            comments: comments.into_iter().take(1).collect(),
            comments_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Full representation of a single post with every comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    pub likes: Likes,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostDetail {
    pub fn new(post: &Post, comments: Vec<Comment>) -> Self {
        Self {
            id: post.id,
            author: post.author.clone(),
            text: post.text.clone(),
            likes: post.likes.clone(),
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Builds summary and detail views, loading comments as needed.
#[derive(Clone)]
pub struct FeedProjection {
    comments: Arc<dyn EntityStore<Comment>>,
}

impl FeedProjection {
    pub fn new(comments: Arc<dyn EntityStore<Comment>>) -> Self {
        Self { comments }
    }

    pub async fn summarize(&self, post: &Post) -> Result<PostSummary, DomainError> {
        let comments = self.comments_of(post).await?;
        Ok(PostSummary::new(post, comments))
    }

    pub async fn detail(&self, post: &Post) -> Result<PostDetail, DomainError> {
        let comments = self.comments_of(post).await?;
        Ok(PostDetail::new(post, comments))
    }

    /// Comments of `post` in the post's order. A listed id can briefly lack
    /// its record while a removal is in flight; it is left out.
    pub async fn comments_of(&self, post: &Post) -> Result<Vec<Comment>, DomainError> {
        if post.comment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<Uuid, Comment> = self
            .comments
            .get_many(&post.comment_ids)
            .await?
            .into_iter()
            .filter(|c| c.post_id == post.id)
            .map(|c| (c.id, c))
            .collect();

        Ok(post
            .comment_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect())
    }
}
