use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, LikeTarget, Likeable, Likes, Post};
use crate::error::DomainError;
use crate::ports::{EntityStore, Stores};

/// Likes on posts and comments.
///
/// Each call is a single atomic add-if-absent or remove-if-present on the
/// target, so a double submit from one user yields exactly one like and one
/// `AlreadyLiked`.
#[derive(Clone)]
pub struct EngagementService {
    posts: Arc<dyn EntityStore<Post>>,
    comments: Arc<dyn EntityStore<Comment>>,
}

#[derive(Debug, Clone, Copy)]
enum Toggle {
    Like,
    Unlike,
}

impl EngagementService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            comments: stores.comments.clone(),
        }
    }

    /// Prepend the caller's like. `AlreadyLiked` if present.
    pub async fn like(&self, target: LikeTarget, caller_id: Uuid) -> Result<Likes, DomainError> {
        self.toggle(target, caller_id, Toggle::Like).await
    }

    /// Remove the caller's like. `NotLiked` if absent.
    pub async fn unlike(&self, target: LikeTarget, caller_id: Uuid) -> Result<Likes, DomainError> {
        self.toggle(target, caller_id, Toggle::Unlike).await
    }

    async fn toggle(
        &self,
        target: LikeTarget,
        caller_id: Uuid,
        toggle: Toggle,
    ) -> Result<Likes, DomainError> {
        let likes = match target {
            LikeTarget::Post(id) => apply(self.posts.as_ref(), id, caller_id, toggle).await?,
            LikeTarget::Comment(id) => apply(self.comments.as_ref(), id, caller_id, toggle).await?,
        };
        tracing::debug!(?target, user = %caller_id, ?toggle, likes = likes.len(), "Likes updated");
        Ok(likes)
    }
}

async fn apply<T: Likeable>(
    store: &dyn EntityStore<T>,
    id: Uuid,
    caller_id: Uuid,
    toggle: Toggle,
) -> Result<Likes, DomainError> {
    let updated = store
        .update(
            id,
            Box::new(move |entity: &mut T| match toggle {
                Toggle::Like => entity.likes_mut().add(caller_id),
                Toggle::Unlike => entity.likes_mut().remove(caller_id),
            }),
        )
        .await?;
    Ok(updated.likes().clone())
}
