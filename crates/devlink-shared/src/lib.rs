//! # DevLink Shared
//!
//! Wire types shared by the API server and its clients, plus the client-side
//! feed state machine that consumes the paged feed endpoint.

pub mod dto;
pub mod feed;
pub mod response;

pub use response::{ErrorResponse, FieldErrorResponse};
