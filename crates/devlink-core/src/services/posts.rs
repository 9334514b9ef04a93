use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use super::{Page, PageParams, ignore_missing, require_text};
use crate::domain::{Caller, Comment, Entity, Post};
use crate::error::{DomainError, RepoError};
use crate::ports::{EntityStore, Stores};
use crate::projection::{FeedProjection, PostDetail, PostSummary};

/// Post lifecycle and feed listing.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn EntityStore<Post>>,
    comments: Arc<dyn EntityStore<Comment>>,
    projection: FeedProjection,
}

impl PostService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            comments: stores.comments.clone(),
            projection: FeedProjection::new(stores.comments.clone()),
        }
    }

    pub async fn create(&self, caller: &Caller, text: String) -> Result<PostDetail, DomainError> {
        let text = require_text(text)?;
        let post = self.posts.upsert(Post::new(caller, text)).await?;
        tracing::debug!(post_id = %post.id, author = %caller.id, "Post created");
        Ok(PostDetail::new(&post, Vec::new()))
    }

    /// Detail view of one post.
    pub async fn get(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.find(post_id).await?;
        self.projection.detail(&post).await
    }

    /// Newest-first page of summaries over every post.
    pub async fn list(&self, params: PageParams) -> Result<Page<PostSummary>, DomainError> {
        let posts = self.posts.find_where(Box::new(|_: &Post| true)).await?;
        self.summarize_page(posts, params).await
    }

    /// Newest-first page of summaries over one author's posts.
    pub async fn list_by_author(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> Result<Page<PostSummary>, DomainError> {
        let posts = self
            .posts
            .find_where(Box::new(move |p: &Post| p.is_authored_by(user_id)))
            .await?;
        self.summarize_page(posts, params).await
    }

    pub async fn edit(
        &self,
        post_id: Uuid,
        caller_id: Uuid,
        text: String,
    ) -> Result<PostDetail, DomainError> {
        let text = require_text(text)?;
        let post = self
            .posts
            .update(
                post_id,
                Box::new(move |post: &mut Post| {
                    if !post.is_authored_by(caller_id) {
                        return Err(DomainError::Forbidden {
                            entity_type: Post::KIND,
                        });
                    }
                    post.edit_text(text);
                    Ok(())
                }),
            )
            .await?;
        self.projection.detail(&post).await
    }

    /// Delete a post and every comment under it. Children are removed before
    /// the parent.
    pub async fn delete(&self, post_id: Uuid, caller_id: Uuid) -> Result<(), DomainError> {
        let post = self.find(post_id).await?;
        if !post.is_authored_by(caller_id) {
            return Err(DomainError::Forbidden {
                entity_type: Post::KIND,
            });
        }

        let mut comment_ids: HashSet<Uuid> = post.comment_ids.iter().copied().collect();
        let orphans = self
            .comments
            .find_where(Box::new(move |c: &Comment| c.post_id == post_id))
            .await?;
        comment_ids.extend(orphans.iter().map(|c| c.id));

        for comment_id in &comment_ids {
            ignore_missing(self.comments.delete(*comment_id).await)?;
        }

        match self.posts.delete(post_id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(DomainError::not_found(Post::KIND, post_id)),
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(
            post_id = %post_id,
            comments = comment_ids.len(),
            "Post deleted"
        );
        Ok(())
    }

    async fn find(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .get(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found(Post::KIND, post_id))
    }

    async fn summarize_page(
        &self,
        mut posts: Vec<Post>,
        params: PageParams,
    ) -> Result<Page<PostSummary>, DomainError> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let page = params.slice(posts);

        let mut items = Vec::with_capacity(page.items.len());
        for post in &page.items {
            items.push(self.projection.summarize(post).await?);
        }

        Ok(Page {
            items,
            total: page.total,
        })
    }
}
