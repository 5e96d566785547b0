//! Outbound notification configuration (SMTP and Expo push).

use serde::{Deserialize, Serialize};

/// SMTP mailer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// When false, emails are written to the log instead of sent.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_user: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address, e.g. `Verrou <no-reply@verrou.app>`.
    #[serde(default = "default_from")]
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_user: String::new(),
            smtp_password: String::new(),
            from: default_from(),
        }
    }
}

/// Expo push gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// When false, push messages are logged and dropped.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Expo push endpoint.
    #[serde(default = "default_expo_url")]
    pub expo_url: String,
    /// Optional Expo access token for enhanced security.
    #[serde(default)]
    pub access_token: Option<String>,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expo_url: default_expo_url(),
            access_token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from() -> String {
    "Verrou <no-reply@verrou.app>".to_string()
}

fn default_true() -> bool {
    true
}

fn default_expo_url() -> String {
    "https://exp.host/--/api/v2/push/send".to_string()
}

fn default_timeout() -> u64 {
    10
}
