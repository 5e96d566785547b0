//! Expo push gateway client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use verrou_core::config::PushConfig;

use super::PushError;

/// Maximum number of messages per gateway request.
pub const CHUNK_SIZE: usize = 100;

/// Whether `token` looks like an Expo push token.
pub fn is_expo_token(token: &str) -> bool {
    ["ExponentPushToken[", "ExpoPushToken["].iter().any(|prefix| {
        token
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(']'))
            .is_some_and(|inner| !inner.is_empty())
    })
}

/// Content of a push notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExpoMessage<'a> {
    to: &'a str,
    #[serde(flatten)]
    notification: &'a PushNotification,
}

/// Result of a send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOutcome {
    /// Tokens delivered to the gateway.
    pub sent: usize,
    /// Tokens rejected before sending.
    pub invalid_tokens: Vec<String>,
}

/// Split tokens into valid and invalid ones, keeping order.
pub fn partition_tokens(tokens: &[String]) -> (Vec<&str>, Vec<String>) {
    let (valid, invalid): (Vec<&String>, Vec<&String>) =
        tokens.iter().partition(|t| is_expo_token(t));
    (
        valid.into_iter().map(String::as_str).collect(),
        invalid.into_iter().cloned().collect(),
    )
}

/// Posts notifications to the Expo gateway.
#[derive(Debug, Clone)]
pub struct ExpoPushClient {
    client: reqwest::Client,
    url: String,
    access_token: Option<String>,
    enabled: bool,
}

impl ExpoPushClient {
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: config.expo_url.clone(),
            access_token: config.access_token.clone(),
            enabled: config.enabled,
        })
    }

    /// Send `notification` to every valid token, in chunks.
    ///
    /// Gateway failures are logged per chunk and do not abort the send.
    pub async fn send(&self, tokens: &[String], notification: &PushNotification) -> PushOutcome {
        let (valid, invalid_tokens) = partition_tokens(tokens);
        if !invalid_tokens.is_empty() {
            debug!(count = invalid_tokens.len(), "Skipping invalid push tokens");
        }

        if !self.enabled {
            info!(count = valid.len(), "Push disabled, notification dropped");
            return PushOutcome {
                sent: 0,
                invalid_tokens,
            };
        }

        let mut sent = 0;
        for chunk in valid.chunks(CHUNK_SIZE) {
            let messages: Vec<ExpoMessage<'_>> = chunk
                .iter()
                .map(|to| ExpoMessage { to: *to, notification })
                .collect();
            match self.post(&messages).await {
                Ok(()) => sent += chunk.len(),
                Err(e) => warn!(error = %e, size = chunk.len(), "Push chunk failed"),
            }
        }

        PushOutcome {
            sent,
            invalid_tokens,
        }
    }

    /// Send to one token, ignoring invalid or missing tokens.
    pub async fn send_to(&self, token: Option<&str>, notification: &PushNotification) {
        if let Some(token) = token.filter(|t| is_expo_token(t)) {
            self.send(&[token.to_string()], notification).await;
        }
    }

    async fn post(&self, messages: &[ExpoMessage<'_>]) -> Result<(), PushError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(PushError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_expo_tokens() {
        assert!(is_expo_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(is_expo_token("ExpoPushToken[abc]"));
        assert!(!is_expo_token("ExponentPushToken[]"));
        assert!(!is_expo_token("ExponentPushToken[abc"));
        assert!(!is_expo_token("fcm:abc"));
        assert!(!is_expo_token(""));
    }

    #[test]
    fn partition_keeps_order() {
        let tokens = vec![
            "bad-1".to_string(),
            "ExpoPushToken[a]".to_string(),
            "bad-2".to_string(),
            "ExponentPushToken[b]".to_string(),
        ];
        let (valid, invalid) = partition_tokens(&tokens);
        assert_eq!(valid, vec!["ExpoPushToken[a]", "ExponentPushToken[b]"]);
        assert_eq!(invalid, vec!["bad-1", "bad-2"]);
    }

    #[test]
    fn messages_serialize_flat() {
        let notification = PushNotification {
            title: Some("Verrou".into()),
            body: "Asset reported".into(),
            ..Default::default()
        };
        let message = ExpoMessage {
            to: "ExpoPushToken[a]",
            notification: &notification,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"to": "ExpoPushToken[a]", "title": "Verrou", "body": "Asset reported"})
        );
    }

    #[tokio::test]
    async fn only_invalid_tokens_sends_nothing() {
        let client = ExpoPushClient::new(&PushConfig::default()).unwrap();
        let outcome = client
            .send(&["nope".to_string()], &PushNotification::default())
            .await;
        assert_eq!(outcome.sent, 0);
        assert_eq!(outcome.invalid_tokens, vec!["nope"]);
    }

    #[test]
    fn chunking_splits_at_one_hundred() {
        let tokens: Vec<String> = (0..250).map(|i| format!("ExpoPushToken[{i}]")).collect();
        let (valid, _) = partition_tokens(&tokens);
        let sizes: Vec<usize> = valid.chunks(CHUNK_SIZE).map(<[&str]>::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }
}
