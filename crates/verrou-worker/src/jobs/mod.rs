//! Built-in job implementations.

pub mod log_cleanup;

pub use log_cleanup::LogCleanupJob;
