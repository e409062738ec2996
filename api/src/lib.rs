//! HTTP transport for the token lifecycle engine.
//!
//! Exposed as a library so integration tests can build the app directly.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;
