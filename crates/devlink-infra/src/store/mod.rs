//! Entity store implementations - PostgreSQL and in-memory fallback.

mod memory;

#[cfg(feature = "postgres")]
mod postgres;

pub use memory::{InMemoryEntityStore, in_memory_stores};

#[cfg(feature = "postgres")]
pub use postgres::{PostgresEntityStore, postgres_stores};
