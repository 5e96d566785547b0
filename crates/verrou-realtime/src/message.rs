//! Wire format of realtime messages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Names of server-sent events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    /// The owner's asset list changed.
    AssetUpdated,
    /// The category list changed.
    CategoryUpdated,
    /// A room was joined.
    RoomJoined,
    /// The last inbound message was rejected.
    Error,
}

/// `{"event": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEvent {
    pub event: EventName,
    pub data: serde_json::Value,
}

impl ServerEvent {
    pub fn new(event: EventName, data: serde_json::Value) -> Self {
        Self { event, data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(
            EventName::Error,
            serde_json::json!({ "message": message.into() }),
        )
    }

    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Messages accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Receive the events of a user's room.
    JoinUserRoom { user_id: Uuid },
    /// Keep-alive.
    Ping,
}

/// Room name of a user.
pub fn user_room(user_id: Uuid) -> String {
    format!("user:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_camel_case() {
        let event = ServerEvent::new(EventName::AssetUpdated, serde_json::json!([]));
        assert_eq!(event.to_text(), r#"{"event":"assetUpdated","data":[]}"#);
    }

    #[test]
    fn parses_join_user_room() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"type":"join_user_room","user_id":"{id}"}}"#);
        let msg: InboundMessage = serde_json::from_str(&raw).unwrap();
        assert_eq!(msg, InboundMessage::JoinUserRoom { user_id: id });
    }
}
