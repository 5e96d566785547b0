//! Mapping of sqlx errors into [`AppError`].
//!
//! Transport-level failures (pool exhaustion, dropped connections, a
//! proxy tripping its circuit breaker) surface as `ServiceUnavailable`
//! so clients get a 503 instead of a generic 500.

use tracing::warn;

use verrou_core::error::{AppError, ErrorKind};

/// Messages emitted by connection proxies when the database is unreachable.
const UNAVAILABLE_MARKERS: [&str; 3] = [
    "Can't reach database server",
    "Circuit breaker open",
    "Too many authentication errors",
];

/// Whether the error means the database cannot be reached right now.
pub fn is_unavailable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => true,
        other => {
            let message = other.to_string();
            UNAVAILABLE_MARKERS.iter().any(|m| message.contains(m))
        }
    }
}

/// Name of the violated unique constraint, if `err` is a unique violation.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            db_err.constraint().map(str::to_string)
        }
        _ => None,
    }
}

/// Whether `err` is a foreign key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Map an sqlx error, keeping it as the source.
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    if is_unavailable(&err) {
        warn!(error = %err, context, "Database unavailable");
        return AppError::with_source(
            ErrorKind::ServiceUnavailable,
            "Database temporarily unavailable, please retry later",
            err,
        );
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}

/// Closure form of [`map_sqlx_error`] for `.map_err(db_err("..."))`.
pub fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| map_sqlx_error(context, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_unavailable() {
        let err = map_sqlx_error("list assets", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert!(is_unavailable(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn circuit_breaker_message_is_unavailable() {
        let err = sqlx::Error::Protocol("Circuit breaker open: upstream failing".into());
        assert!(is_unavailable(&err));
        let err = sqlx::Error::Protocol("Too many authentication errors".into());
        assert_eq!(map_sqlx_error("x", err).kind, ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn other_errors_stay_database_errors() {
        let err = map_sqlx_error("find user", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "find user");
        assert!(err.source.is_some());
    }
}
