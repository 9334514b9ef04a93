//! Client-side infinite feed.
//!
//! [`FeedState`] holds the posts fetched so far and a [`PaginationCursor`]
//! that decides when the next page is due. Both are plain values changed
//! only through [`FeedCommand`]s; running the returned [`PageRequest`]s is
//! left to the caller.

mod cursor;
mod state;

pub use cursor::{CursorConfig, CursorState, PageRequest, PaginationCursor};
pub use state::{FeedCommand, FeedState};
