//! # verrou-database
//!
//! PostgreSQL access for Verrou: the connection pool, the migration
//! runner, the generic paginator and one repository per table.

pub mod connection;
pub mod error;
pub mod migration;
pub mod paginate;
pub mod repositories;

pub use connection::DatabasePool;
pub use paginate::ListSpec;
