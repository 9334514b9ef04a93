//! # DevLink Core
//!
//! The domain layer of DevLink: posts, comments, likes and profiles, plus the
//! services that enforce their invariants. Infrastructure is reached only
//! through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod projection;
pub mod services;

pub use error::{DomainError, FieldError, RepoError, ValidationErrors};
pub use projection::{FeedProjection, PostDetail, PostSummary};
