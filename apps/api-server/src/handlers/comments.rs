//! Comment and comment-like handlers.

use actix_web::{HttpResponse, web};
use devlink_core::domain::LikeTarget;
use devlink_shared::dto::CommentRequest;
use uuid::Uuid;

use crate::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
///
/// Responds with the post's full comment list, newest first.
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comments = state
        .comments
        .add(path.into_inner(), &identity.0, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(mapping::comments(&comments)))
}

/// PATCH /api/comments/{comment_id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .edit(path.into_inner(), identity.0.id, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::comment(&comment)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comments = state
        .comments
        .remove(post_id, comment_id, identity.0.id)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::comments(&comments)))
}

/// POST /api/comments/{comment_id}/likes
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let likes = state
        .engagement
        .like(LikeTarget::Comment(path.into_inner()), identity.0.id)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::likes(&likes)))
}

/// DELETE /api/comments/{comment_id}/likes
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let likes = state
        .engagement
        .unlike(LikeTarget::Comment(path.into_inner()), identity.0.id)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::likes(&likes)))
}
