//! Route handlers organized by domain.

pub mod alerte;
pub mod asset;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod donation;
pub mod health;
pub mod log;
pub mod notification;
pub mod post;
pub mod profile;
pub mod role;
pub mod signal;
pub mod subscription;
pub mod user;
pub mod ws;
