//! Transactional email.

pub mod log;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;

use verrou_core::config::MailConfig;

pub use self::log::LogMailer;
pub use self::smtp::SmtpMailer;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Sends plain-text emails.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// SMTP when mail is enabled, the log otherwise.
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, EmailError> {
    if config.enabled {
        Ok(Arc::new(SmtpMailer::new(config)?))
    } else {
        Ok(Arc::new(LogMailer))
    }
}
