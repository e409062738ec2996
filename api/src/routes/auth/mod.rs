//! Token endpoints
//!
//! - Login: issue a pair for an identity
//! - Refresh: rotate a pair
//! - Validate: check a bearer access token

pub mod login;
pub mod refresh;
pub mod validate;

use std::sync::Arc;

use tp_core::repositories::TokenRepository;
use tp_core::services::token::TokenService;

/// Application state shared by the token handlers
pub struct AppState<T: TokenRepository> {
    pub token_service: Arc<TokenService<T>>,
}

impl<T: TokenRepository> AppState<T> {
    pub fn new(token_service: Arc<TokenService<T>>) -> Self {
        Self { token_service }
    }
}
