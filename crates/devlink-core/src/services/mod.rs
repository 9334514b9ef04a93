//! Application services - each operation is one unit of work against the
//! stores.

mod comments;
mod engagement;
mod page;
mod posts;
mod profiles;

pub use comments::CommentService;
pub use engagement::EngagementService;
pub use page::{Page, PageParams, PagePolicy};
pub use posts::PostService;
pub use profiles::{
    EducationInput, EducationPatch, ExperienceInput, ExperiencePatch, ProfileInput,
    ProfileService, ProfileView,
};

use crate::error::{DomainError, RepoError};

/// Reject blank post or comment bodies.
fn require_text(text: String) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::invalid("text", "Text is required"));
    }
    Ok(text)
}

/// Treat an already-missing record as deleted.
fn ignore_missing(result: Result<(), RepoError>) -> Result<(), RepoError> {
    match result {
        Err(RepoError::NotFound) => Ok(()),
        other => other,
    }
}
