//! # verrou-entity
//!
//! Domain entity models for Verrou. Every struct in this crate represents
//! a database table row or a domain value object. Database rows derive
//! `sqlx::FromRow`; enums backed by PostgreSQL types derive `sqlx::Type`.

pub mod alerte;
pub mod asset;
pub mod category;
pub mod donation;
pub mod log;
pub mod notification;
pub mod post;
pub mod role;
pub mod signal;
pub mod stats;
pub mod subscription;
pub mod user;
