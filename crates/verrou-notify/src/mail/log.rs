//! Mailer that only writes to the log.

use async_trait::async_trait;
use tracing::info;

use super::{EmailError, Mailer};

/// Logs outgoing emails instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        info!(to, subject, body_len = body.len(), "Email not sent (mail disabled)");
        Ok(())
    }
}
