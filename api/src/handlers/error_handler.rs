//! Mapping of engine errors onto HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use tracing::{debug, error};

use tp_core::errors::{DomainError, TokenError};
use tp_shared::{error_codes, ErrorResponse};

fn error_response(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

pub fn bad_request(message: &str) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, error_codes::BAD_REQUEST, message)
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Credential problems are all 401; only the code tells expired from invalid.
/// Backend failures are 5xx so clients can retry instead of re-authenticating.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match &error {
        DomainError::Token(TokenError::TokenExpired) => {
            debug!("Rejected expired token");
            error_response(StatusCode::UNAUTHORIZED, error_codes::TOKEN_EXPIRED, "Token expired")
        }
        DomainError::Token(_) => {
            debug!(error = %error, "Rejected invalid token");
            error_response(StatusCode::UNAUTHORIZED, error_codes::TOKEN_INVALID, "Token invalid")
        }
        DomainError::Unauthenticated => error_response(
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHENTICATED,
            "Could not generate token pair",
        ),
        DomainError::StoreFailure { .. } => {
            error!(error = %error, "Credential store failure");
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::STORE_UNAVAILABLE,
                "Credential store is unavailable, please try again later",
            )
        }
        DomainError::Internal { .. } => {
            error!(error = %error, "Internal error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            )
        }
    }
}

/// Body extraction failures for `web::Json`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected request body");
    let response = bad_request("access and refresh tokens required in body");
    InternalError::from_response(err, response).into()
}

/// Query extraction failures for `web::Query`
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected query string");
    let response = bad_request("Invalid uuid");
    InternalError::from_response(err, response).into()
}
