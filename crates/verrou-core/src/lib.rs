//! # verrou-core
//!
//! Core crate for Verrou. Contains configuration schemas, the unified
//! error system, pagination/sorting/filter types and the slug and
//! pseudo generators shared by every other crate.
//!
//! This crate has **no** internal dependencies on other Verrou crates.

pub mod config;
pub mod error;
pub mod result;
pub mod text;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
