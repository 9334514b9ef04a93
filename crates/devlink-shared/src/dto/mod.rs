//! Data Transfer Objects - request/response types for the API.
//!
//! Request types carry only user-editable fields. Anything else a client
//! sends (`author`, `likes`, `comments`, ...) is dropped during
//! deserialization.

mod posts;
mod profiles;

pub use posts::{
    AuthorResponse, CommentRequest, CommentResponse, FeedPage, FeedQuery, LikeResponse,
    PostDetailResponse, PostRequest, PostSummaryResponse,
};
pub use profiles::{
    EducationPatchRequest, EducationRequest, EducationResponse, ExperiencePatchRequest,
    ExperienceRequest, ExperienceResponse, ProfileRequest, ProfileResponse, SocialResponse,
};
