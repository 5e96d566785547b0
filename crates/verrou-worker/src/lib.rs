//! Scheduled tasks for Verrou.
//!
//! This crate provides:
//! - A cron scheduler that runs inside the server process
//! - The audit log retention job

pub mod jobs;
pub mod scheduler;

pub use jobs::LogCleanupJob;
pub use scheduler::CronScheduler;
