//! Keyed-collection storage port.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Education, Entity, Experience, Post, Profile};
use crate::error::{DomainError, RepoError};

/// In-place change applied atomically by [`EntityStore::update`].
pub type Mutation<T> = Box<dyn FnOnce(&mut T) -> Result<(), DomainError> + Send>;

/// Filter for [`EntityStore::find_where`].
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// One collection of entities keyed by id.
///
/// The store has no query language; callers filter with plain predicates.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Find an entity by its id.
    async fn get(&self, id: Uuid) -> Result<Option<T>, RepoError>;

    /// Every entity whose id is in `ids`, in no particular order. Unknown ids
    /// are skipped.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>, RepoError>;

    /// Insert or replace an entity.
    async fn upsert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by id. `RepoError::NotFound` if absent.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// All entities matching `predicate`, in no particular order.
    async fn find_where(&self, predicate: Predicate<T>) -> Result<Vec<T>, RepoError>;

    /// Apply `mutation` to the stored entity as one atomic step.
    ///
    /// A mutation that returns an error leaves the stored entity untouched.
    /// Fails with `DomainError::NotFound` when no entity has this id.
    async fn update(&self, id: Uuid, mutation: Mutation<T>) -> Result<T, DomainError>;
}

/// Every collection the services work with.
#[derive(Clone)]
pub struct Stores {
    pub posts: Arc<dyn EntityStore<Post>>,
    pub comments: Arc<dyn EntityStore<Comment>>,
    pub profiles: Arc<dyn EntityStore<Profile>>,
    pub experiences: Arc<dyn EntityStore<Experience>>,
    pub educations: Arc<dyn EntityStore<Education>>,
}
