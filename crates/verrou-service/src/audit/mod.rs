//! Audit trail of mutating requests.

pub mod service;

pub use service::LogService;
