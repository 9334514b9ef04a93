use std::sync::Arc;

use uuid::Uuid;

use super::{ignore_missing, require_text};
use crate::domain::{Caller, Comment, Entity, Post};
use crate::error::DomainError;
use crate::ports::{EntityStore, Stores};
use crate::projection::FeedProjection;

/// Comments under posts.
///
/// Comments are addressed by id, never by position, so concurrent removals
/// of different comments cannot step on each other.
#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn EntityStore<Post>>,
    comments: Arc<dyn EntityStore<Comment>>,
    projection: FeedProjection,
}

impl CommentService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            comments: stores.comments.clone(),
            projection: FeedProjection::new(stores.comments.clone()),
        }
    }

    /// Add a comment at the front of the post's list and return the full,
    /// updated list.
    pub async fn add(
        &self,
        post_id: Uuid,
        caller: &Caller,
        text: String,
    ) -> Result<Vec<Comment>, DomainError> {
        let text = require_text(text)?;
        if self.posts.get(post_id).await?.is_none() {
            return Err(DomainError::not_found(Post::KIND, post_id));
        }

        // The record is stored first; it only becomes visible once its id is
        // attached to the post.
        let comment = self
            .comments
            .upsert(Comment::new(post_id, caller, text))
            .await?;
        let comment_id = comment.id;

        let attached = self
            .posts
            .update(
                post_id,
                Box::new(move |post: &mut Post| {
                    post.attach_comment(comment_id);
                    Ok(())
                }),
            )
            .await;

        let post = match attached {
            Ok(post) => post,
            Err(e) => {
                if let Err(cleanup) = ignore_missing(self.comments.delete(comment_id).await) {
                    tracing::warn!(comment_id = %comment_id, error = %cleanup, "Orphan comment left behind");
                }
                return Err(e);
            }
        };

        tracing::debug!(post_id = %post_id, comment_id = %comment_id, "Comment added");
        self.projection.comments_of(&post).await
    }

    /// Change a comment's text. Likes and position are untouched.
    pub async fn edit(
        &self,
        comment_id: Uuid,
        caller_id: Uuid,
        text: String,
    ) -> Result<Comment, DomainError> {
        let text = require_text(text)?;
        self.comments
            .update(
                comment_id,
                Box::new(move |comment: &mut Comment| {
                    if !comment.is_authored_by(caller_id) {
                        return Err(DomainError::Forbidden {
                            entity_type: Comment::KIND,
                        });
                    }
                    comment.edit_text(text);
                    Ok(())
                }),
            )
            .await
    }

    /// Remove one comment and return the remaining list. Siblings keep their
    /// ids, order and timestamps.
    pub async fn remove(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Vec<Comment>, DomainError> {
        if self.posts.get(post_id).await?.is_none() {
            return Err(DomainError::not_found(Post::KIND, post_id));
        }

        let comment = self
            .comments
            .get(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found(Comment::KIND, comment_id))?;
        if !comment.is_authored_by(caller_id) {
            return Err(DomainError::Forbidden {
                entity_type: Comment::KIND,
            });
        }

        let post = self
            .posts
            .update(
                post_id,
                Box::new(move |post: &mut Post| {
                    if post.detach_comment(comment_id) {
                        Ok(())
                    } else {
                        Err(DomainError::not_found(Comment::KIND, comment_id))
                    }
                }),
            )
            .await?;

        if let Err(e) = ignore_missing(self.comments.delete(comment_id).await) {
            tracing::warn!(comment_id = %comment_id, error = %e, "Detached comment record not deleted");
        }

        tracing::debug!(post_id = %post_id, comment_id = %comment_id, "Comment removed");
        self.projection.comments_of(&post).await
    }
}
