//! Identity port - resolves who is calling.

use crate::domain::Caller;
use crate::error::DomainError;

/// Supplied by the authentication layer. The core never checks credentials
/// itself; it only consumes the resolved caller.
pub trait IdentityProvider: Send + Sync {
    /// Resolve the caller behind a bearer credential, if any.
    fn current_caller(&self, bearer_token: Option<&str>) -> Result<Caller, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<AuthError> for DomainError {
    fn from(_: AuthError) -> Self {
        DomainError::Unauthenticated
    }
}
