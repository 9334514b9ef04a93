//! Post and post-like handlers.

use actix_web::{HttpResponse, web};
use devlink_core::domain::LikeTarget;
use devlink_core::services::PageParams;
use devlink_shared::dto::{FeedQuery, PostRequest};
use uuid::Uuid;

use crate::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?limit&offset
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let params = PageParams::resolve(query.limit, query.offset, &state.feed)?;
    let page = state.posts.list(params).await?;
    Ok(HttpResponse::Ok().json(mapping::feed_page(&page)))
}

/// GET /api/users/{user_id}/posts?limit&offset
pub async fn list_by_author(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let params = PageParams::resolve(query.limit, query.offset, &state.feed)?;
    let page = state.posts.list_by_author(path.into_inner(), params).await?;
    Ok(HttpResponse::Ok().json(mapping::feed_page(&page)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(&identity.0, body.into_inner().text).await?;
    Ok(HttpResponse::Created().json(mapping::post_detail(&post)))
}

/// GET /api/posts/{post_id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(mapping::post_detail(&post)))
}

/// PATCH /api/posts/{post_id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .edit(path.into_inner(), identity.0.id, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::post_detail(&post)))
}

/// DELETE /api/posts/{post_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner(), identity.0.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{post_id}/likes
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let likes = state
        .engagement
        .like(LikeTarget::Post(path.into_inner()), identity.0.id)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::likes(&likes)))
}

/// DELETE /api/posts/{post_id}/likes
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let likes = state
        .engagement
        .unlike(LikeTarget::Post(path.into_inner()), identity.0.id)
        .await?;
    Ok(HttpResponse::Ok().json(mapping::likes(&likes)))
}
