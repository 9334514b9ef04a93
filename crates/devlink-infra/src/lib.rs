//! # DevLink Infrastructure
//!
//! Concrete implementations of the ports defined in `devlink-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL document store via SeaORM
//! - `auth` - JWT identity provider
//! - `rate-limit` - Keyed rate limiting via governor

pub mod database;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use store::{InMemoryEntityStore, in_memory_stores};

#[cfg(feature = "postgres")]
pub use store::{PostgresEntityStore, postgres_stores};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtIdentityProvider};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
