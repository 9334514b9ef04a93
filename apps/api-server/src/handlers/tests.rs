use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use devlink_core::domain::Caller;
use devlink_core::ports::IdentityProvider;
use devlink_core::services::PagePolicy;
use devlink_infra::{JwtConfig, JwtIdentityProvider};
use serde_json::{Value, json};
use uuid::Uuid;

use super::configure_app;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

struct TestEnv {
    state: AppState,
    jwt: Arc<JwtIdentityProvider>,
}

impl TestEnv {
    fn new() -> Self {
        let jwt = Arc::new(JwtIdentityProvider::new(JwtConfig::default()));
        let identity: Arc<dyn IdentityProvider> = jwt.clone();
        Self {
            state: AppState::in_memory(identity, PagePolicy::default()),
            jwt,
        }
    }

    fn auth(&self, caller: &Caller) -> (header::HeaderName, String) {
        let token = self.jwt.issue_token(caller).unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }
}

fn user(name: &str) -> Caller {
    Caller::new(Uuid::new_v4(), name)
}

macro_rules! app {
    ($env:expr) => {
        test::init_service(
            App::new()
                .configure(configure_app($env.state.clone()))
                .wrap(RequestIdMiddleware),
        )
        .await
    };
}

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }};
}

#[actix_rt::test]
async fn test_health_reports_storage() {
    let env = TestEnv::new();
    let app = app!(env);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn test_request_id_is_echoed() {
    let env = TestEnv::new();
    let app = app!(env);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("x-request-id", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
}

#[actix_rt::test]
async fn test_mutations_require_a_token() {
    let env = TestEnv::new();
    let app = app!(env);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"text": "Hello"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "/problems/unauthenticated");

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
            .set_json(json!({"text": "Hello"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_create_post_ignores_client_owned_fields() {
    let env = TestEnv::new();
    let app = app!(env);
    let ada = user("Ada");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(env.auth(&ada))
            .set_json(json!({
                "text": "Hello",
                "author": {"userId": Uuid::new_v4(), "name": "Mallory"},
                "likes": [{"userId": Uuid::new_v4()}],
                "comments": [{"text": "fake"}]
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"]["userId"], ada.id.to_string());
    assert_eq!(body["author"]["name"], "Ada");
    assert_eq!(body["likes"], json!([]));
    assert_eq!(body["comments"], json!([]));
    assert!(body.get("commentsCount").is_none());
}

#[actix_rt::test]
async fn test_blank_post_is_unprocessable() {
    let env = TestEnv::new();
    let app = app!(env);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(env.auth(&user("Ada")))
            .set_json(json!({"text": "   "}))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "text");
}

#[actix_rt::test]
async fn test_malformed_json_is_bad_request() {
    let env = TestEnv::new();
    let app = app!(env);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(env.auth(&user("Ada")))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"text\": ")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "/problems/bad-request");
    assert!(body["request_id"].is_string());
}

#[actix_rt::test]
async fn test_feed_pages_and_bounds() {
    let env = TestEnv::new();
    let app = app!(env);
    let ada = user("Ada");
    for text in ["one", "two", "three"] {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(env.auth(&ada))
                .set_json(json!({ "text": text }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/posts?limit=2"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["commentsCount"], 0);

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?limit=2&offset=2"));
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    for uri in ["/api/posts?limit=0", "/api/posts?limit=51"] {
        let (status, body) = call!(app, test::TestRequest::get().uri(uri));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "limit");
    }

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/posts?limit=lots"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "/problems/bad-request");
    assert!(body["detail"].is_string());
    assert!(body["request_id"].is_string());

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/users/{}/posts", ada.id))
    );
    assert_eq!(body["total"], 3);
    let (_, body) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/users/{}/posts", Uuid::new_v4()))
    );
    assert_eq!(body["total"], 0);
}

#[actix_rt::test]
async fn test_like_conflicts_are_distinct() {
    let env = TestEnv::new();
    let app = app!(env);
    let (ada, bob) = (user("Ada"), user("Bob"));
    let post = env.state.posts.create(&ada, "Hello".into()).await.unwrap();
    let likes_uri = format!("/api/posts/{}/likes", post.id);

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri(&likes_uri).insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"userId": bob.id}]));

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri(&likes_uri).insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["type"], "/problems/already-liked");

    let (status, body) = call!(
        app,
        test::TestRequest::delete().uri(&likes_uri).insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = call!(
        app,
        test::TestRequest::delete().uri(&likes_uri).insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "/problems/not-liked");
}

#[actix_rt::test]
async fn test_only_author_may_edit() {
    let env = TestEnv::new();
    let app = app!(env);
    let (ada, bob) = (user("Ada"), user("Bob"));
    let post = env.state.posts.create(&ada, "Hello".into()).await.unwrap();
    let uri = format!("/api/posts/{}", post.id);

    let (status, body) = call!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(env.auth(&bob))
            .set_json(json!({"text": "Bye"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["type"], "/problems/forbidden");

    let (status, body) = call!(
        app,
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header(env.auth(&ada))
            .set_json(json!({"text": "Hello again"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Hello again");
}

#[actix_rt::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let env = TestEnv::new();
    let app = app!(env);

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{}", Uuid::new_v4()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "/problems/not-found");

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/posts/not-a-uuid"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_comment_flow() {
    let env = TestEnv::new();
    let app = app!(env);
    let (ada, bob) = (user("Ada"), user("Bob"));
    let post = env.state.posts.create(&ada, "Hello".into()).await.unwrap();
    let comments_uri = format!("/api/posts/{}/comments", post.id);

    for text in ["first", "second"] {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri(&comments_uri)
                .insert_header(env.auth(&bob))
                .set_json(json!({ "text": text }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, feed) = call!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(feed["items"][0]["commentsCount"], 2);
    assert_eq!(feed["items"][0]["comments"].as_array().unwrap().len(), 1);
    assert_eq!(feed["items"][0]["comments"][0]["text"], "second");

    let (_, detail) = call!(app, test::TestRequest::get().uri(&format!("/api/posts/{}", post.id)));
    let newest = detail["comments"][0]["id"].as_str().unwrap().to_string();
    let oldest = detail["comments"][1]["id"].as_str().unwrap().to_string();

    let (status, _) = call!(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/comments/{newest}"))
            .insert_header(env.auth(&ada))
            .set_json(json!({"text": "hijacked"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/comments/{oldest}/likes"))
            .insert_header(env.auth(&ada))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"userId": ada.id}]));

    let (status, body) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("{comments_uri}/{newest}"))
            .insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], oldest);
    assert_eq!(body[0]["likes"], json!([{"userId": ada.id}]));
}

#[actix_rt::test]
async fn test_deleted_post_takes_likes_and_comments_with_it() {
    let env = TestEnv::new();
    let app = app!(env);
    let (ada, bob) = (user("Ada"), user("Bob"));
    let post = env.state.posts.create(&ada, "Hello".into()).await.unwrap();
    let uri = format!("/api/posts/{}", post.id);

    let (_, likes) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("{uri}/likes"))
            .insert_header(env.auth(&bob))
    );
    assert_eq!(likes, json!([{"userId": bob.id}]));

    let (status, _) = call!(
        app,
        test::TestRequest::delete().uri(&uri).insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(
        app,
        test::TestRequest::delete().uri(&uri).insert_header(env.auth(&ada))
    );
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = call!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, feed) = call!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(feed["total"], 0);
    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("{uri}/likes"))
            .insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_profile_flow() {
    let env = TestEnv::new();
    let app = app!(env);
    let (ada, bob) = (user("Ada"), user("Bob"));

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/profile")
            .insert_header(env.auth(&ada))
            .set_json(json!({"bio": "hi"}))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["status", "skills"]);

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/profile")
            .insert_header(env.auth(&ada))
            .set_json(json!({"status": "Developer", "skills": "rust, sql", "githubUsername": "ada"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skills"], json!(["rust", "sql"]));
    assert_eq!(body["githubUsername"], "ada");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/profile/experience")
            .insert_header(env.auth(&ada))
            .set_json(json!({
                "title": "Engineer",
                "company": "Initech",
                "from": "2020-01-01",
                "current": true
            }))
    );
    assert_eq!(status, StatusCode::OK);
    let entry_id = body["experience"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["experience"][0]["to"], Value::Null);

    let (_, public) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/profiles/user/{}", ada.id))
    );
    assert_eq!(public["experience"][0]["id"], entry_id);

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/profile/me").insert_header(env.auth(&bob)));
    assert_eq!(status, StatusCode::NOT_FOUND);

    call!(
        app,
        test::TestRequest::put()
            .uri("/api/profile")
            .insert_header(env.auth(&bob))
            .set_json(json!({"status": "Student", "skills": "go"}))
    );
    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/profile/experience/{entry_id}"))
            .insert_header(env.auth(&bob))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, all) = call!(app, test::TestRequest::get().uri("/api/profiles"));
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, body) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/profile/experience/{entry_id}"))
            .insert_header(env.auth(&ada))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["experience"], json!([]));

    let (status, _) = call!(
        app,
        test::TestRequest::delete().uri("/api/profile").insert_header(env.auth(&ada))
    );
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/profiles/user/{}", ada.id))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_rate_limit_throttles_mutations_only() {
    use std::time::Duration;

    use devlink_infra::{InMemoryRateLimiter, RateLimitConfig};

    use crate::middleware::rate_limit::RateLimitMiddleware;

    let env = TestEnv::new();
    let limiter = InMemoryRateLimiter::new(&RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(60),
    })
    .unwrap();
    let app = test::init_service(
        App::new()
            .configure(configure_app(env.state.clone()))
            .wrap(RateLimitMiddleware::new(Arc::new(limiter)))
            .wrap(RequestIdMiddleware),
    )
    .await;
    let ada = user("Ada");

    for _ in 0..2 {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(env.auth(&ada))
                .set_json(json!({"text": "spam"}))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(env.auth(&ada))
        .set_json(json!({"text": "spam"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));

    // Another user has a bucket of their own.
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(env.auth(&user("Bob")))
            .set_json(json!({"text": "hello"}))
    );
    assert_eq!(status, StatusCode::CREATED);

    for _ in 0..5 {
        let (status, _) = call!(app, test::TestRequest::get().uri("/api/posts"));
        assert_eq!(status, StatusCode::OK);
    }
}
