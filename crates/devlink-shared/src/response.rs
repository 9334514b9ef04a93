//! Standardized API error responses (RFC 7807 problem details).

use serde::{Deserialize, Serialize};

/// Problem type URIs, one per error kind, so clients can branch on `type`
/// without parsing titles.
pub mod problem {
    pub const NOT_FOUND: &str = "/problems/not-found";
    pub const FORBIDDEN: &str = "/problems/forbidden";
    pub const ALREADY_LIKED: &str = "/problems/already-liked";
    pub const NOT_LIKED: &str = "/problems/not-liked";
    pub const VALIDATION: &str = "/problems/validation";
    pub const UNAUTHENTICATED: &str = "/problems/unauthenticated";
    pub const RATE_LIMITED: &str = "/problems/rate-limited";
    pub const BAD_REQUEST: &str = "/problems/bad-request";
    pub const INTERNAL: &str = "/problems/internal";
}

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Field-level validation messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorResponse>,

    /// Request ID for debugging purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            errors: Vec::new(),
            request_id: None,
        }
    }

    pub fn with_type(mut self, error_type: &str) -> Self {
        self.error_type = error_type.to_string();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<FieldErrorResponse>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request")
            .with_type(problem::BAD_REQUEST)
            .with_detail(detail)
    }

    pub fn not_liked() -> Self {
        Self::new(400, "Not Liked")
            .with_type(problem::NOT_LIKED)
            .with_detail("The item has not been liked by this user")
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized").with_type(problem::UNAUTHENTICATED)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(403, "Forbidden")
            .with_type(problem::FORBIDDEN)
            .with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found")
            .with_type(problem::NOT_FOUND)
            .with_detail(detail)
    }

    pub fn already_liked() -> Self {
        Self::new(409, "Already Liked")
            .with_type(problem::ALREADY_LIKED)
            .with_detail("The item has already been liked by this user")
    }

    pub fn validation(errors: Vec<FieldErrorResponse>) -> Self {
        Self::new(422, "Validation Failed")
            .with_type(problem::VALIDATION)
            .with_errors(errors)
    }

    pub fn too_many_requests() -> Self {
        Self::new(429, "Too Many Requests").with_type(problem::RATE_LIMITED)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error").with_type(problem::INTERNAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_lists_fields() {
        let body = ErrorResponse::validation(vec![FieldErrorResponse {
            field: "text".into(),
            message: "Text is required".into(),
        }]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], problem::VALIDATION);
        assert_eq!(json["status"], 422);
        assert_eq!(json["errors"][0]["field"], "text");
    }

    #[test]
    fn test_optional_members_are_omitted() {
        let json = serde_json::to_value(ErrorResponse::unauthorized()).unwrap();
        assert!(json.get("detail").is_none());
        assert!(json.get("errors").is_none());
        assert!(json.get("request_id").is_none());
    }
}
