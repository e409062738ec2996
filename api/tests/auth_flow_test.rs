//! Integration tests for the token endpoints

use actix_web::{http::header, test, web};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use tp_api::app::create_app;
use tp_api::routes::auth::AppState;
use tp_core::repositories::InMemoryTokenRepository;
use tp_core::services::token::{TokenService, TokenServiceConfig};

fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: "test_secret".to_string(),
        hash_cost: 4,
        ..Default::default()
    }
}

fn token_service() -> Arc<TokenService<InMemoryTokenRepository>> {
    Arc::new(TokenService::new(InMemoryTokenRepository::new(), test_config()))
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(web::Data::new(AppState::new(token_service())))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "up");
}

#[actix_web::test]
async fn test_unknown_route() {
    let app = test::init_service(create_app(web::Data::new(AppState::new(token_service())))).await;

    let req = test::TestRequest::get().uri("/api/v1/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_login_validate_refresh_flow() {
    let service = token_service();
    let app = test::init_service(create_app(web::Data::new(AppState::new(service.clone())))).await;
    let user_id = Uuid::new_v4();

    // Login
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/auth/login?id={}", user_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let first: Value = test::read_body_json(resp).await;
    let access = first["access"].as_str().unwrap().to_string();
    let refresh = first["refresh"].as_str().unwrap().to_string();

    // Validate
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/validate")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "valid");
    assert_eq!(body["subject"], user_id.to_string());
    let first_refresh_id = body["refresh_id"].clone();

    // Refresh
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "access": access, "refresh": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let second: Value = test::read_body_json(resp).await;

    let claims = service
        .validate_access(second["access"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, user_id);
    assert_ne!(json!(claims.refresh_id), first_refresh_id);

    // Replaying the first pair is rejected
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "access": access, "refresh": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");
}

#[actix_web::test]
async fn test_login_rejects_invalid_uuid() {
    let app = test::init_service(create_app(web::Data::new(AppState::new(token_service())))).await;

    for uri in ["/api/v1/auth/login?id=not-a-uuid", "/api/v1/auth/login"] {
        let req = test::TestRequest::post().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "BAD_REQUEST");
    }
}

#[actix_web::test]
async fn test_refresh_requires_both_tokens() {
    let app = test::init_service(create_app(web::Data::new(AppState::new(token_service())))).await;

    let bodies = [
        json!({ "access": "a.b.c" }),
        json!({ "refresh": "abc" }),
        json!({ "access": "", "refresh": "abc" }),
    ];

    for body in bodies {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "{}", body);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_refresh_with_garbage_tokens() {
    let app = test::init_service(create_app(web::Data::new(AppState::new(token_service())))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "access": "a.b.c", "refresh": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");
}

#[actix_web::test]
async fn test_validate_header_errors() {
    let app = test::init_service(create_app(web::Data::new(AppState::new(token_service())))).await;

    let req = test::TestRequest::get().uri("/api/v1/auth/validate").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/validate")
        .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_validate_expired_and_invalid_tokens() {
    let service = token_service();
    let app = test::init_service(create_app(web::Data::new(AppState::new(service.clone())))).await;

    let expired = service
        .issue_pair_at(Uuid::new_v4(), Utc::now() - Duration::hours(2))
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/validate")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", expired.access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_EXPIRED");

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/validate")
        .insert_header((header::AUTHORIZATION, "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");
}

#[actix_web::test]
async fn test_refresh_with_expired_access_token() {
    let service = token_service();
    let app = test::init_service(create_app(web::Data::new(AppState::new(service.clone())))).await;

    let expired = service
        .issue_pair_at(Uuid::new_v4(), Utc::now() - Duration::hours(2))
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "access": expired.access, "refresh": expired.refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
}
