//! Convenience result type alias for Verrou.

use crate::error::AppError;

/// A specialized `Result` type for Verrou operations.
pub type AppResult<T> = Result<T, AppError>;
