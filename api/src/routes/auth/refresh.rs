use actix_web::{web, HttpResponse};

use tp_core::repositories::TokenRepository;

use crate::dto::auth_dto::{RefreshRequest, TokenPairResponse};
use crate::handlers::error_handler::{bad_request, handle_domain_error};

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a token pair for a new one. The presented refresh credential
/// is consumed and cannot be used again.
///
/// # Request Body
///
/// ```json
/// {
///     "access": "eyJ...",
///     "refresh": "AQ..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Either token missing from the body
/// - 401 Unauthorized: `TOKEN_INVALID` or `TOKEN_EXPIRED`
/// - 503 Service Unavailable: Credential store unreachable
pub async fn refresh<T>(
    state: web::Data<AppState<T>>,
    request: web::Json<RefreshRequest>,
) -> HttpResponse
where
    T: TokenRepository + 'static,
{
    if !request.is_complete() {
        return bad_request("access and refresh tokens required in body");
    }

    match state
        .token_service
        .refresh_pair(&request.access, &request.refresh)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(TokenPairResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
