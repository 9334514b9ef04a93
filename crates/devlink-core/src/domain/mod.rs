//! Domain entities - the core business objects.

mod caller;
mod comment;
mod like;
mod post;
mod profile;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

pub use caller::{Author, Caller};
pub use comment::Comment;
pub use like::{Like, LikeTarget, Likeable, Likes};
pub use post::Post;
pub use profile::{
    DateRange, Education, Experience, Profile, ProfileEntry, SocialLinks, parse_skills,
};

/// Anything stored in an [`EntityStore`](crate::ports::EntityStore).
pub trait Entity: Clone + Send + Sync + 'static {
    /// Collection the entity lives in.
    const COLLECTION: &'static str;
    /// Singular name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

/// Next `updated_at` value, strictly greater than `previous`.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}
