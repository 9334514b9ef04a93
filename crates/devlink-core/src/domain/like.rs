use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entity;
use crate::error::DomainError;

/// A single like. Only ever inserted or removed whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
}

/// Ordered like list, newest first, holding each user at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Likes(Vec<Like>);

impl Likes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0.iter().any(|like| like.user_id == user_id)
    }

    /// Prepend a like for `user_id`; `AlreadyLiked` if one exists.
    pub fn add(&mut self, user_id: Uuid) -> Result<(), DomainError> {
        if self.contains(user_id) {
            return Err(DomainError::AlreadyLiked);
        }
        self.0.insert(0, Like { user_id });
        Ok(())
    }

    /// Remove the like for `user_id`; `NotLiked` if there is none.
    pub fn remove(&mut self, user_id: Uuid) -> Result<(), DomainError> {
        let position = self
            .0
            .iter()
            .position(|like| like.user_id == user_id)
            .ok_or(DomainError::NotLiked)?;
        self.0.remove(position);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Like> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Like] {
        &self.0
    }
}

impl FromIterator<Uuid> for Likes {
    /// Builds a list in the given order, dropping repeated users.
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut likes = Vec::new();
        for user_id in iter {
            if !likes.iter().any(|like: &Like| like.user_id == user_id) {
                likes.push(Like { user_id });
            }
        }
        Self(likes)
    }
}

/// An entity that carries its own like list.
pub trait Likeable: Entity {
    fn likes(&self) -> &Likes;
    fn likes_mut(&mut self) -> &mut Likes;
}

/// What a like is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post(Uuid),
    Comment(Uuid),
}
