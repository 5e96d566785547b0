//! # verrou-notify
//!
//! Outbound notifications: transactional email over SMTP and mobile
//! push through the Expo gateway.

pub mod mail;
pub mod push;

pub use mail::{EmailError, LogMailer, Mailer, SmtpMailer};
pub use push::{ExpoPushClient, PushError, PushNotification, PushOutcome};
