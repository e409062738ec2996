//! Application factory
//!
//! Builds the actix-web application around a shared `AppState`. Request
//! logging is layered on by the caller so tests get the bare app.

use actix_web::{web, App, HttpResponse};
use serde_json::json;
use tracing::warn;

use tp_core::repositories::TokenRepository;
use tp_shared::{error_codes, ErrorResponse};

use crate::handlers::error_handler::{json_error_handler, query_error_handler};
use crate::routes::auth::{login::login, refresh::refresh, validate::validate, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<T>(
    app_state: web::Data<AppState<T>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    T: TokenRepository + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        // Health check endpoint
        .route("/health", web::get().to(health_check::<T>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<T>))
                    .route("/refresh", web::post().to(refresh::<T>))
                    .route("/validate", web::get().to(validate::<T>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
///
/// Reports 503 while the credential store does not answer, since neither
/// login nor refresh can succeed then.
async fn health_check<T: TokenRepository>(state: web::Data<AppState<T>>) -> HttpResponse {
    let (mut response, status, store) = match state.token_service.repository().ping().await {
        Ok(()) => (HttpResponse::Ok(), "healthy", "up"),
        Err(e) => {
            warn!(error = %e, "Health check: credential store unavailable");
            (HttpResponse::ServiceUnavailable(), "unhealthy", "unavailable")
        }
    };

    response.json(json!({
        "status": status,
        "store": store,
        "service": "tokenpair-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
