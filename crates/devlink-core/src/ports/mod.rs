//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod identity;
mod rate_limit;
mod store;

pub use identity::{AuthError, IdentityProvider};
pub use rate_limit::{RateDecision, RateLimitError, RateLimiter};
pub use store::{EntityStore, Mutation, Predicate, Stores};
