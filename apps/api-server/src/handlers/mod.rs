//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod profiles;

#[cfg(test)]
mod tests;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, error, web};
use devlink_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::observability::RequestId;
use crate::state::AppState;

/// Register application data and every route. Shared by `main` and tests.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.identity.clone()))
            .app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(|err, req| {
                let response = rejected(AppError::BadRequest(err.to_string()), req);
                error::InternalError::from_response(err, response).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, req| {
                let response = rejected(AppError::BadRequest(err.to_string()), req);
                error::InternalError::from_response(err, response).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, req| {
                // An id that does not parse cannot name an existing entity.
                let body = problem(ErrorResponse::not_found(err.to_string()), req);
                error::InternalError::from_response(err, HttpResponse::NotFound().json(body))
                    .into()
            }))
            .configure(configure_routes);
    }
}

/// Response for a request rejected before it reached a handler.
fn rejected(err: AppError, req: &HttpRequest) -> HttpResponse {
    HttpResponse::build(err.status_code()).json(problem(err.problem(), req))
}

fn problem(body: ErrorResponse, req: &HttpRequest) -> ErrorResponse {
    match req.extensions().get::<RequestId>() {
        Some(id) => body.with_request_id(id.as_str()),
        None => body,
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{post_id}", web::get().to(posts::get))
                    .route("/{post_id}", web::patch().to(posts::edit))
                    .route("/{post_id}", web::delete().to(posts::delete))
                    .route("/{post_id}/likes", web::post().to(posts::like))
                    .route("/{post_id}/likes", web::delete().to(posts::unlike))
                    .route("/{post_id}/comments", web::post().to(comments::add))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::remove),
                    ),
            )
            .service(
                web::scope("/comments")
                    .route("/{comment_id}", web::patch().to(comments::edit))
                    .route("/{comment_id}/likes", web::post().to(comments::like))
                    .route("/{comment_id}/likes", web::delete().to(comments::unlike)),
            )
            .route("/users/{user_id}/posts", web::get().to(posts::list_by_author))
            .route("/profiles", web::get().to(profiles::list))
            .route("/profiles/user/{user_id}", web::get().to(profiles::get_by_user))
            .service(
                web::scope("/profile")
                    .route("", web::put().to(profiles::save))
                    .route("", web::delete().to(profiles::delete))
                    .route("/me", web::get().to(profiles::me))
                    .route("/experience", web::post().to(profiles::add_experience))
                    .route("/experience/{id}", web::patch().to(profiles::update_experience))
                    .route("/experience/{id}", web::delete().to(profiles::remove_experience))
                    .route("/education", web::post().to(profiles::add_education))
                    .route("/education/{id}", web::patch().to(profiles::update_education))
                    .route("/education/{id}", web::delete().to(profiles::remove_education)),
            ),
    );
}
