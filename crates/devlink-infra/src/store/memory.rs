//! In-memory entity store - used when no database is configured.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use devlink_core::domain::Entity;
use devlink_core::ports::{EntityStore, Mutation, Predicate, Stores};
use devlink_core::{DomainError, RepoError};

/// One collection held in a `HashMap` behind an async `RwLock`.
///
/// `update` runs the mutation on a clone while holding the write lock and
/// only writes it back on success.
/// Note: Data is lost on process restart.
pub struct InMemoryEntityStore<T> {
    entities: RwLock<HashMap<Uuid, T>>,
}

impl<T> InMemoryEntityStore<T> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for InMemoryEntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryEntityStore<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let entities = self.entities.read().await;
        Ok(entities.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>, RepoError> {
        let entities = self.entities.read().await;
        Ok(ids.iter().filter_map(|id| entities.get(id).cloned()).collect())
    }

    async fn upsert(&self, entity: T) -> Result<T, RepoError> {
        let mut entities = self.entities.write().await;
        entities.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut entities = self.entities.write().await;
        entities.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }

    async fn find_where(&self, predicate: Predicate<T>) -> Result<Vec<T>, RepoError> {
        let entities = self.entities.read().await;
        Ok(entities
            .values()
            .filter(|entity| predicate(*entity))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, mutation: Mutation<T>) -> Result<T, DomainError> {
        let mut entities = self.entities.write().await;
        let stored = entities
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(T::KIND, id))?;

        let mut next = stored.clone();
        mutation(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }
}

/// A full set of empty in-memory collections.
pub fn in_memory_stores() -> Stores {
    Stores {
        posts: Arc::new(InMemoryEntityStore::new()),
        comments: Arc::new(InMemoryEntityStore::new()),
        profiles: Arc::new(InMemoryEntityStore::new()),
        experiences: Arc::new(InMemoryEntityStore::new()),
        educations: Arc::new(InMemoryEntityStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devlink_core::domain::{Caller, Post};

    fn post(text: &str) -> Post {
        Post::new(&Caller::new(Uuid::new_v4(), "Ada"), text.to_string())
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let store = InMemoryEntityStore::new();
        let post = store.upsert(post("Hello")).await.unwrap();

        assert_eq!(store.get(post.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn test_get_many_skips_unknown_ids() {
        let store = InMemoryEntityStore::new();
        let a = store.upsert(post("a")).await.unwrap();
        let b = store.upsert(post("b")).await.unwrap();
        store.upsert(post("c")).await.unwrap();

        let mut found = store
            .get_many(&[b.id, Uuid::new_v4(), a.id])
            .await
            .unwrap();
        found.sort_by_key(|p| p.text.clone());
        assert_eq!(found, vec![a, b]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store: InMemoryEntityStore<Post> = InMemoryEntityStore::new();
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_where_filters() {
        let store = InMemoryEntityStore::new();
        store.upsert(post("keep")).await.unwrap();
        store.upsert(post("drop")).await.unwrap();

        let found = store
            .find_where(Box::new(|p: &Post| p.text == "keep"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_mutation_leaves_entity_untouched() {
        let store = InMemoryEntityStore::new();
        let original = store.upsert(post("Hello")).await.unwrap();

        let result = store
            .update(
                original.id,
                Box::new(|p: &mut Post| {
                    p.text = "half-applied".to_string();
                    Err(DomainError::AlreadyLiked)
                }),
            )
            .await;

        assert!(matches!(result, Err(DomainError::AlreadyLiked)));
        assert_eq!(store.get(original.id).await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store: InMemoryEntityStore<Post> = InMemoryEntityStore::new();
        let result = store
            .update(Uuid::new_v4(), Box::new(|_: &mut Post| Ok(())))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity_type: "post",
                ..
            })
        ));
    }
}
