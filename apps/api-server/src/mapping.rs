//! Conversions between wire DTOs and domain types.
//!
//! Request mappings copy only user-editable fields, so nothing a client adds
//! to a body (author, likes, comments) can reach the services.

use devlink_core::ValidationErrors;
use devlink_core::domain::{Author, Comment, DateRange, Education, Experience, Likes};
use devlink_core::projection::{PostDetail, PostSummary};
use devlink_core::services::{
    EducationInput, EducationPatch, ExperienceInput, ExperiencePatch, Page, ProfileInput,
    ProfileView,
};
use devlink_shared::FieldErrorResponse;
use devlink_shared::dto::{
    AuthorResponse, CommentResponse, EducationPatchRequest, EducationRequest, EducationResponse,
    ExperiencePatchRequest, ExperienceRequest, ExperienceResponse, FeedPage, LikeResponse,
    PostDetailResponse, PostSummaryResponse, ProfileRequest, ProfileResponse, SocialResponse,
};

pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldErrorResponse> {
    errors
        .fields()
        .map(|e| FieldErrorResponse {
            field: e.field.to_string(),
            message: e.message.clone(),
        })
        .collect()
}

fn author(author: &Author) -> AuthorResponse {
    AuthorResponse {
        user_id: author.user_id,
        name: author.name.clone(),
        avatar: author.avatar.clone(),
    }
}

pub fn likes(likes: &Likes) -> Vec<LikeResponse> {
    likes
        .iter()
        .map(|like| LikeResponse {
            user_id: like.user_id,
        })
        .collect()
}

pub fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author: author(&comment.author),
        text: comment.text.clone(),
        likes: likes(&comment.likes),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub fn comments(comments: &[Comment]) -> Vec<CommentResponse> {
    comments.iter().map(comment).collect()
}

pub fn post_summary(post: &PostSummary) -> PostSummaryResponse {
    PostSummaryResponse {
        id: post.id,
        author: author(&post.author),
        text: post.text.clone(),
        likes: likes(&post.likes),
        comments: comments(&post.comments),
        comments_count: post.comments_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn post_detail(post: &PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        id: post.id,
        author: author(&post.author),
        text: post.text.clone(),
        likes: likes(&post.likes),
        comments: comments(&post.comments),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn feed_page(page: &Page<PostSummary>) -> FeedPage<PostSummaryResponse> {
    FeedPage {
        items: page.items.iter().map(post_summary).collect(),
        total: page.total,
    }
}

fn experience(entry: &Experience) -> ExperienceResponse {
    let DateRange { from, to, current } = entry.period;
    ExperienceResponse {
        id: entry.id,
        title: entry.title.clone(),
        company: entry.company.clone(),
        location: entry.location.clone(),
        from,
        to,
        current,
        description: entry.description.clone(),
    }
}

fn education(entry: &Education) -> EducationResponse {
    let DateRange { from, to, current } = entry.period;
    EducationResponse {
        id: entry.id,
        school: entry.school.clone(),
        degree: entry.degree.clone(),
        field_of_study: entry.field_of_study.clone(),
        from,
        to,
        current,
        description: entry.description.clone(),
    }
}

pub fn profile(view: &ProfileView) -> ProfileResponse {
    let profile = &view.profile;
    ProfileResponse {
        user_id: profile.user_id,
        company: profile.company.clone(),
        website: profile.website.clone(),
        location: profile.location.clone(),
        status: profile.status.clone(),
        skills: profile.skills.clone(),
        bio: profile.bio.clone(),
        github_username: profile.github_username.clone(),
        social: SocialResponse {
            youtube: profile.social.youtube.clone(),
            twitter: profile.social.twitter.clone(),
            facebook: profile.social.facebook.clone(),
            linkedin: profile.social.linkedin.clone(),
            instagram: profile.social.instagram.clone(),
        },
        experience: view.experience.iter().map(experience).collect(),
        education: view.education.iter().map(education).collect(),
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }
}

pub fn profile_input(request: ProfileRequest) -> ProfileInput {
    ProfileInput {
        company: request.company,
        website: request.website,
        location: request.location,
        status: request.status,
        skills: request.skills,
        bio: request.bio,
        github_username: request.github_username,
        youtube: request.youtube,
        twitter: request.twitter,
        facebook: request.facebook,
        linkedin: request.linkedin,
        instagram: request.instagram,
    }
}

pub fn experience_input(request: ExperienceRequest) -> ExperienceInput {
    ExperienceInput {
        title: request.title,
        company: request.company,
        location: request.location,
        from: request.from,
        to: request.to,
        current: request.current,
        description: request.description,
    }
}

pub fn experience_patch(request: ExperiencePatchRequest) -> ExperiencePatch {
    ExperiencePatch {
        title: request.title,
        company: request.company,
        location: request.location,
        from: request.from,
        to: request.to,
        current: request.current,
        description: request.description,
    }
}

pub fn education_input(request: EducationRequest) -> EducationInput {
    EducationInput {
        school: request.school,
        degree: request.degree,
        field_of_study: request.field_of_study,
        from: request.from,
        to: request.to,
        current: request.current,
        description: request.description,
    }
}

pub fn education_patch(request: EducationPatchRequest) -> EducationPatch {
    EducationPatch {
        school: request.school,
        degree: request.degree,
        field_of_study: request.field_of_study,
        from: request.from,
        to: request.to,
        current: request.current,
        description: request.description,
    }
}
