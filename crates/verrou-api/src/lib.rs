//! # verrou-api
//!
//! HTTP API layer for Verrou built on Axum.
//!
//! Provides all REST endpoints, the WebSocket upgrade, middleware
//! (request logging, audit log, CORS), extractors, DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, serve};
pub use state::AppState;
