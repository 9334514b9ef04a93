//! Developer profile handlers.

use actix_web::{HttpResponse, web};
use devlink_shared::dto::{
    EducationPatchRequest, EducationRequest, ExperiencePatchRequest, ExperienceRequest,
    ProfileRequest, ProfileResponse,
};
use uuid::Uuid;

use crate::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profiles
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let profiles = state.profiles.list().await?;
    let body: Vec<ProfileResponse> = profiles.iter().map(mapping::profile).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/profiles/user/{user_id}
pub async fn get_by_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state.profiles.get_by_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// GET /api/profile/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let view = state.profiles.get_mine(&identity.0).await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// PUT /api/profile - create on first call, patch afterwards.
pub async fn save(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileRequest>,
) -> AppResult<HttpResponse> {
    let input = mapping::profile_input(body.into_inner());
    let view = state.profiles.save(&identity.0, input).await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// DELETE /api/profile
pub async fn delete(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.profiles.delete(&identity.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/profile/experience
pub async fn add_experience(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ExperienceRequest>,
) -> AppResult<HttpResponse> {
    let input = mapping::experience_input(body.into_inner());
    let view = state.profiles.add_experience(&identity.0, input).await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// PATCH /api/profile/experience/{id}
pub async fn update_experience(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ExperiencePatchRequest>,
) -> AppResult<HttpResponse> {
    let patch = mapping::experience_patch(body.into_inner());
    let view = state
        .profiles
        .update_experience(&identity.0, path.into_inner(), patch)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// DELETE /api/profile/experience/{id}
pub async fn remove_experience(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state
        .profiles
        .remove_experience(&identity.0, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// POST /api/profile/education
pub async fn add_education(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<EducationRequest>,
) -> AppResult<HttpResponse> {
    let input = mapping::education_input(body.into_inner());
    let view = state.profiles.add_education(&identity.0, input).await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// PATCH /api/profile/education/{id}
pub async fn update_education(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<EducationPatchRequest>,
) -> AppResult<HttpResponse> {
    let patch = mapping::education_patch(body.into_inner());
    let view = state
        .profiles
        .update_education(&identity.0, path.into_inner(), patch)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}

/// DELETE /api/profile/education/{id}
pub async fn remove_education(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state
        .profiles
        .remove_education(&identity.0, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(mapping::profile(&view)))
}
