//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use devlink_core::services::PagePolicy;
use devlink_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on in-memory stores.
    pub database: Option<DatabaseConfig>,
    pub feed: PagePolicy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 100),
            min_connections: parse_or("DB_MIN_CONNECTIONS", 10),
        });

        let defaults = PagePolicy::default();
        let mut feed = PagePolicy {
            default_limit: parse_or("FEED_DEFAULT_LIMIT", defaults.default_limit),
            max_limit: parse_or("FEED_MAX_LIMIT", defaults.max_limit),
        };
        if feed.default_limit > feed.max_limit {
            tracing::warn!(
                default_limit = feed.default_limit,
                max_limit = feed.max_limit,
                "FEED_DEFAULT_LIMIT exceeds FEED_MAX_LIMIT, clamping"
            );
            feed.default_limit = feed.max_limit;
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database,
            feed,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
