//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use devlink_core::ports::AuthError;
use devlink_core::DomainError;
use devlink_shared::ErrorResponse;

use crate::mapping;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    Domain(DomainError),
    Auth(AuthError),
    /// Malformed request syntax (unparseable body or query).
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Domain(err) => write!(f, "{}", err),
            AppError::Auth(err) => write!(f, "{}", err),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(err) => match err {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
                DomainError::AlreadyLiked => StatusCode::CONFLICT,
                DomainError::NotLiked => StatusCode::BAD_REQUEST,
                DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
                DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

impl AppError {
    /// Problem document for this error, without request context.
    pub fn problem(&self) -> ErrorResponse {
        match self {
            AppError::Domain(err) => domain_problem(err),
            AppError::Auth(err) => auth_problem(err),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        }
    }
}

fn domain_problem(err: &DomainError) -> ErrorResponse {
    match err {
        DomainError::NotFound { entity_type, id } => {
            ErrorResponse::not_found(format!("{} with id {} not found", entity_type, id))
        }
        DomainError::Forbidden { entity_type } => {
            ErrorResponse::forbidden(format!("Only the author may change this {}", entity_type))
        }
        DomainError::AlreadyLiked => ErrorResponse::already_liked(),
        DomainError::NotLiked => ErrorResponse::not_liked(),
        DomainError::Validation(errors) => ErrorResponse::validation(mapping::field_errors(errors)),
        DomainError::Unauthenticated => ErrorResponse::unauthorized(),
        DomainError::Storage(repo) => {
            // The only kind that indicates a fault.
            tracing::error!(error = %repo, "Storage failure");
            ErrorResponse::internal_error()
        }
    }
}

fn auth_problem(err: &AuthError) -> ErrorResponse {
    match err {
        AuthError::TokenExpired => ErrorResponse::unauthorized()
            .with_detail("Your authentication token has expired. Please login again."),
        AuthError::InvalidToken(msg) => ErrorResponse::unauthorized().with_detail(msg.clone()),
        AuthError::MissingAuth => ErrorResponse::unauthorized()
            .with_detail("Please provide a valid Bearer token in the Authorization header."),
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Domain(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use devlink_core::{RepoError, ValidationErrors};
    use uuid::Uuid;

    use super::*;

    async fn body_json(err: AppError) -> serde_json::Value {
        let response = err.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_each_domain_kind_has_distinct_status() {
        let cases = [
            (DomainError::not_found("post", Uuid::nil()), 404),
            (DomainError::Forbidden { entity_type: "post" }, 403),
            (DomainError::AlreadyLiked, 409),
            (DomainError::NotLiked, 400),
            (DomainError::Validation(ValidationErrors::new()), 422),
            (DomainError::Unauthenticated, 401),
            (DomainError::Storage(RepoError::Connection("down".into())), 500),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code().as_u16(), status);
        }
    }

    #[actix_rt::test]
    async fn test_validation_lists_fields() {
        let json = body_json(DomainError::invalid("text", "Text is required").into()).await;
        assert_eq!(json["type"], "/problems/validation");
        assert_eq!(json["errors"][0]["field"], "text");
        assert_eq!(json["errors"][0]["message"], "Text is required");
    }

    #[actix_rt::test]
    async fn test_bad_request_keeps_detail() {
        let err = AppError::BadRequest("expected value at line 1 column 10".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let json = body_json(err).await;
        assert_eq!(json["type"], "/problems/bad-request");
        assert_eq!(json["detail"], "expected value at line 1 column 10");
    }

    #[actix_rt::test]
    async fn test_storage_detail_is_not_leaked() {
        let err = DomainError::Storage(RepoError::Query("relation \"documents\" missing".into()));
        let json = body_json(err.into()).await;
        assert_eq!(json["status"], 500);
        assert!(json.get("detail").is_none());
    }
}
