//! PostgreSQL entity store over a single JSONB document table.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, IntoActiveModel, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use devlink_core::domain::Entity;
use devlink_core::ports::{EntityStore, Mutation, Predicate, Stores};
use devlink_core::{DomainError, RepoError};

use crate::database::entity::document::{self, Entity as DocumentEntity};

/// One collection stored as `documents` rows sharing a `collection` value.
///
/// `update` locks the row with `SELECT ... FOR UPDATE` inside a transaction,
/// so concurrent mutations of one entity are serialized by the database.
pub struct PostgresEntityStore<T> {
    db: DbConn,
    _entity: PhantomData<fn() -> T>,
}

impl<T> PostgresEntityStore<T> {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

fn query_error(e: DbErr) -> RepoError {
    let message = e.to_string();
    if message.contains("duplicate") || message.contains("unique") {
        RepoError::Constraint(message)
    } else {
        RepoError::Query(message)
    }
}

fn encode<T: Serialize>(entity: &T) -> Result<serde_json::Value, RepoError> {
    serde_json::to_value(entity).map_err(|e| RepoError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(row: &document::Model) -> Result<T, RepoError> {
    serde_json::from_value(row.body.clone()).map_err(|e| {
        tracing::error!(
            collection = %row.collection,
            id = %row.id,
            error = %e,
            "Stored document does not match its entity type"
        );
        RepoError::Serialization(e.to_string())
    })
}

#[async_trait]
impl<T> EntityStore<T> for PostgresEntityStore<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    async fn get(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let row = DocumentEntity::find_by_id((T::COLLECTION.to_owned(), id))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        row.as_ref().map(decode::<T>).transpose()
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = DocumentEntity::find()
            .filter(document::Column::Collection.eq(T::COLLECTION))
            .filter(document::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        rows.iter().map(decode::<T>).collect()
    }

    async fn upsert(&self, entity: T) -> Result<T, RepoError> {
        let row = document::ActiveModel {
            collection: Set(T::COLLECTION.to_owned()),
            id: Set(entity.id()),
            body: Set(encode(&entity)?),
            updated_at: Set(Utc::now().into()),
        };

        DocumentEntity::insert(row)
            .on_conflict(
                OnConflict::columns([document::Column::Collection, document::Column::Id])
                    .update_columns([document::Column::Body, document::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(query_error)?;

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = DocumentEntity::delete_by_id((T::COLLECTION.to_owned(), id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_where(&self, predicate: Predicate<T>) -> Result<Vec<T>, RepoError> {
        let rows = DocumentEntity::find()
            .filter(document::Column::Collection.eq(T::COLLECTION))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut matches = Vec::new();
        for row in &rows {
            let entity: T = decode(row)?;
            if predicate(&entity) {
                matches.push(entity);
            }
        }
        Ok(matches)
    }

    async fn update(&self, id: Uuid, mutation: Mutation<T>) -> Result<T, DomainError> {
        // Dropping the transaction without commit rolls it back.
        let txn = self.db.begin().await.map_err(query_error)?;

        let row = DocumentEntity::find_by_id((T::COLLECTION.to_owned(), id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(query_error)?
            .ok_or_else(|| DomainError::not_found(T::KIND, id))?;

        let mut entity: T = decode(&row)?;
        mutation(&mut entity)?;

        let mut active = row.into_active_model();
        active.body = Set(encode(&entity)?);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await.map_err(query_error)?;

        txn.commit().await.map_err(query_error)?;
        Ok(entity)
    }
}

/// Every collection backed by the same connection pool.
pub fn postgres_stores(db: DbConn) -> Stores {
    Stores {
        posts: Arc::new(PostgresEntityStore::new(db.clone())),
        comments: Arc::new(PostgresEntityStore::new(db.clone())),
        profiles: Arc::new(PostgresEntityStore::new(db.clone())),
        experiences: Arc::new(PostgresEntityStore::new(db.clone())),
        educations: Arc::new(PostgresEntityStore::new(db)),
    }
}
