pub mod error_handler;

pub use error_handler::{bad_request, handle_domain_error, json_error_handler, query_error_handler};
