//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool setup and shutdown
//! - Schema migration for the refresh record table
//! - `TokenRepository` implementation

pub mod connection;
pub mod migrations;
pub mod mysql;


pub use connection::DatabasePool;
pub use migrations::run_migrations;
pub use mysql::MySqlTokenRepository;
