//! # DevLink API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer};
use devlink_core::ports::IdentityProvider;
use devlink_infra::JwtIdentityProvider;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod mapping;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[cfg(feature = "rate-limit")]
use devlink_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use devlink_infra::{InMemoryRateLimiter, RateLimitConfig};
#[cfg(feature = "rate-limit")]
use middleware::rate_limit::RateLimitMiddleware;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting DevLink API Server on {}:{}",
        config.host,
        config.port
    );

    let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::from_env());
    let state = AppState::new(config.database.as_ref(), identity, config.feed).await;

    #[cfg(feature = "rate-limit")]
    let limiter: Arc<dyn RateLimiter> = {
        let rate_config = RateLimitConfig::from_env();
        tracing::info!(
            max_requests = rate_config.max_requests,
            window_secs = rate_config.window.as_secs(),
            "Rate limiting enabled"
        );
        Arc::new(InMemoryRateLimiter::new(&rate_config).map_err(std::io::Error::other)?)
    };

    HttpServer::new(move || {
        let app = App::new().configure(handlers::configure_app(state.clone()));

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(RateLimitMiddleware::new(limiter.clone()));

        app.wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
