//! Router-level integration tests.
//!
//! The database pool is lazy and points at a closed port, so these tests
//! only cover paths that are decided before any query runs.

mod helpers;

mod auth_test;
mod catalog_test;
mod health_test;
mod log_test;
mod notification_test;
mod rbac_test;
mod routing_test;
