//! Caller identity extractor.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use devlink_core::domain::Caller;
use devlink_core::ports::{AuthError, IdentityProvider};

use crate::middleware::error::AppError;

/// The authenticated caller. Handlers that take this reject anonymous
/// requests with 401.
///
/// ```ignore
/// async fn create_post(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.0.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub Caller);

/// The `Bearer` credential of a request. `Ok(None)` when no Authorization
/// header was sent.
pub fn bearer_token(req: &HttpRequest) -> Result<Option<&str>, AuthError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(provider) = req.app_data::<web::Data<Arc<dyn IdentityProvider>>>() else {
            return ready(Err(AppError::Internal(
                "IdentityProvider not found in app data".to_string(),
            )));
        };

        let resolved = bearer_token(req)
            .and_then(|token| provider.current_caller(token))
            .map(Identity)
            .map_err(AppError::from);
        ready(resolved)
    }
}
