//! Application state - shared across all handlers.

use std::sync::Arc;

use devlink_core::ports::{IdentityProvider, Stores};
use devlink_core::services::{
    CommentService, EngagementService, PagePolicy, PostService, ProfileService,
};
use devlink_infra::database::DatabaseConfig;
use devlink_infra::in_memory_stores;

#[cfg(feature = "postgres")]
use devlink_infra::{database::connect, postgres_stores};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub engagement: EngagementService,
    pub profiles: ProfileService,
    pub identity: Arc<dyn IdentityProvider>,
    pub feed: PagePolicy,
    /// Which store backend is in use, for the health endpoint.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, connecting to Postgres when configured.
    pub async fn new(
        db_config: Option<&DatabaseConfig>,
        identity: Arc<dyn IdentityProvider>,
        feed: PagePolicy,
    ) -> Self {
        let (stores, storage) = open_stores(db_config).await;
        tracing::info!(storage, "Application state initialized");
        Self::with_stores(&stores, storage, identity, feed)
    }

    /// State over fresh in-memory stores.
    pub fn in_memory(identity: Arc<dyn IdentityProvider>, feed: PagePolicy) -> Self {
        Self::with_stores(&in_memory_stores(), "memory", identity, feed)
    }

    fn with_stores(
        stores: &Stores,
        storage: &'static str,
        identity: Arc<dyn IdentityProvider>,
        feed: PagePolicy,
    ) -> Self {
        Self {
            posts: PostService::new(stores),
            comments: CommentService::new(stores),
            engagement: EngagementService::new(stores),
            profiles: ProfileService::new(stores),
            identity,
            feed,
            storage,
        }
    }
}

#[cfg(feature = "postgres")]
async fn open_stores(db_config: Option<&DatabaseConfig>) -> (Stores, &'static str) {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return (in_memory_stores(), "memory");
    };

    match connect(config).await {
        Ok(db) => (postgres_stores(db), "postgres"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            (in_memory_stores(), "memory")
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_stores(db_config: Option<&DatabaseConfig>) -> (Stores, &'static str) {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    (in_memory_stores(), "memory")
}
