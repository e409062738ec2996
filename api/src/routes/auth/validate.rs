use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse};

use tp_core::repositories::TokenRepository;
use tp_shared::{error_codes, ErrorResponse};

use crate::dto::auth_dto::ValidateResponse;
use crate::handlers::error_handler::{bad_request, handle_domain_error};

use super::AppState;

#[derive(Debug, PartialEq, Eq)]
enum BearerError {
    Missing,
    Malformed,
}

/// Extracts the token from `Authorization: Bearer <token>`
fn extract_bearer(req: &HttpRequest) -> Result<&str, BearerError> {
    let value = match req.headers().get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| BearerError::Malformed)?,
        None => return Err(BearerError::Missing),
    };

    if value.is_empty() {
        return Err(BearerError::Missing);
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(BearerError::Malformed),
    }
}

/// Handler for GET /api/v1/auth/validate
///
/// Validates the bearer access token. Never touches the credential store.
///
/// ## Errors
/// - 400 Bad Request: No Authorization header
/// - 401 Unauthorized: Not a bearer header, or the token is invalid/expired
pub async fn validate<T>(state: web::Data<AppState<T>>, req: HttpRequest) -> HttpResponse
where
    T: TokenRepository + 'static,
{
    let token = match extract_bearer(&req) {
        Ok(token) => token,
        Err(BearerError::Missing) => return bad_request("No Authorization header found"),
        Err(BearerError::Malformed) => {
            return HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::UNAUTHENTICATED,
                "Invalid Authorization header format",
            ))
        }
    };

    match state.token_service.validate_access(token) {
        Ok(claims) => HttpResponse::Ok().json(ValidateResponse::from(claims)),
        Err(error) => handle_domain_error(error),
    }
}
