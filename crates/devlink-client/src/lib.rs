//! # DevLink Client
//!
//! Drives a [`FeedState`](devlink_shared::feed::FeedState) against the feed
//! endpoint: commands go in, page fetches run on spawned tasks.

mod error;
mod http;
mod loader;

pub use error::ClientError;
pub use http::HttpFeedSource;
pub use loader::{FeedLoader, FeedSource};
