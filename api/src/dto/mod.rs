pub mod auth_dto;

pub use auth_dto::{LoginQuery, RefreshRequest, TokenPairResponse, ValidateResponse};
