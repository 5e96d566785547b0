//! In-app notifications and Expo push delivery.

pub mod service;

pub use service::{NotificationService, RegisterTokenRequest, SendPushRequest};
