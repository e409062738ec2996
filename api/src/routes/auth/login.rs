use actix_web::{web, HttpResponse};
use tracing::info;

use tp_core::repositories::TokenRepository;

use crate::dto::auth_dto::{LoginQuery, TokenPairResponse};
use crate::handlers::error_handler::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/auth/login?id=<uuid>
///
/// Issues a new token pair for the identity.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access": "eyJ...",
///     "refresh": "AQ..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: `id` missing or not a UUID
/// - 401 Unauthorized: The pair could not be issued
pub async fn login<T>(
    state: web::Data<AppState<T>>,
    query: web::Query<LoginQuery>,
) -> HttpResponse
where
    T: TokenRepository + 'static,
{
    match state.token_service.issue_pair(query.id).await {
        Ok(pair) => {
            info!(user_id = %query.id, "Login issued token pair");
            HttpResponse::Ok().json(TokenPairResponse::from(pair))
        }
        Err(error) => handle_domain_error(error),
    }
}
