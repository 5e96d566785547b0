//! Connection registry and event routing.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use verrou_entity::role::RoleName;

use crate::handle::{ConnectionHandle, ConnectionId};
use crate::message::{EventName, InboundMessage, ServerEvent, user_room};

const CHANNEL_BUFFER: usize = 64;

/// All live connections, indexed by id and by room.
#[derive(Debug, Default)]
pub struct RealtimeHub {
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    rooms: DashMap<String, Vec<ConnectionId>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and join its owner's room.
    pub fn register(
        &self,
        user_id: Uuid,
        role: RoleName,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        let handle = Arc::new(ConnectionHandle::new(user_id, role, tx));

        self.by_id.insert(handle.id, handle.clone());
        self.join(handle.id, user_room(user_id));

        info!(conn_id = %handle.id, user_id = %user_id, "Realtime connection registered");
        (handle, rx)
    }

    /// Drop a connection from the registry and every room.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some((_, handle)) = self.by_id.remove(conn_id) {
            handle.mark_dead();
            self.rooms.retain(|_, members| {
                members.retain(|id| id != conn_id);
                !members.is_empty()
            });
            info!(conn_id = %conn_id, user_id = %handle.user_id, "Realtime connection closed");
        }
    }

    fn join(&self, conn_id: ConnectionId, room: String) {
        let mut members = self.rooms.entry(room).or_default();
        if !members.contains(&conn_id) {
            members.push(conn_id);
        }
    }

    /// Handle a text frame from a client.
    ///
    /// Joining another user's room is reserved to staff.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        let Some(handle) = self.by_id.get(conn_id).map(|h| h.value().clone()) else {
            return;
        };

        match serde_json::from_str::<InboundMessage>(raw) {
            Ok(InboundMessage::JoinUserRoom { user_id }) => {
                if user_id != handle.user_id && !handle.role.is_staff() {
                    handle.send(ServerEvent::error("Cannot join another user's room").to_text());
                    return;
                }
                let room = user_room(user_id);
                self.join(handle.id, room.clone());
                debug!(conn_id = %handle.id, room = %room, "Joined room");
                handle.send(
                    ServerEvent::new(EventName::RoomJoined, serde_json::json!({ "room": room }))
                        .to_text(),
                );
            }
            Ok(InboundMessage::Ping) => {}
            Err(e) => {
                handle.send(ServerEvent::error(format!("Invalid message: {e}")).to_text());
            }
        }
    }

    /// Send an event to every connection in `user`'s room.
    pub fn emit_to_user(&self, user_id: Uuid, event: &ServerEvent) -> usize {
        let members = self
            .rooms
            .get(&user_room(user_id))
            .map(|m| m.value().clone())
            .unwrap_or_default();
        self.deliver(&members, event)
    }

    /// Send an event to every connection.
    pub fn broadcast(&self, event: &ServerEvent) -> usize {
        let all: Vec<ConnectionId> = self.by_id.iter().map(|e| *e.key()).collect();
        self.deliver(&all, event)
    }

    fn deliver(&self, targets: &[ConnectionId], event: &ServerEvent) -> usize {
        let text = event.to_text();
        let mut delivered = 0;
        let mut dead = Vec::new();
        for conn_id in targets {
            let Some(handle) = self.by_id.get(conn_id).map(|h| h.value().clone()) else {
                continue;
            };
            if handle.send(text.clone()) {
                delivered += 1;
            } else if !handle.is_alive() {
                dead.push(*conn_id);
            }
        }
        for conn_id in &dead {
            self.unregister(conn_id);
        }
        delivered
    }

    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ServerEvent {
        ServerEvent::new(EventName::AssetUpdated, serde_json::json!({"n": 1}))
    }

    #[tokio::test]
    async fn user_events_reach_only_that_user() {
        let hub = RealtimeHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let (_a, mut rx_a) = hub.register(alice, RoleName::Client);
        let (_b, mut rx_b) = hub.register(bob, RoleName::Client);

        assert_eq!(hub.emit_to_user(alice, &event()), 1);
        assert_eq!(rx_a.recv().await.unwrap(), event().to_text());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_reaches_everyone() {
        let hub = RealtimeHub::new();
        let (_a, mut rx_a) = hub.register(Uuid::new_v4(), RoleName::Client);
        let (_b, mut rx_b) = hub.register(Uuid::new_v4(), RoleName::Admin);

        let categories = ServerEvent::new(EventName::CategoryUpdated, serde_json::json!([]));
        assert_eq!(hub.broadcast(&categories), 2);
        assert!(rx_a.recv().await.unwrap().contains("categoryUpdated"));
        assert!(rx_b.recv().await.unwrap().contains("categoryUpdated"));
    }

    #[tokio::test]
    async fn only_staff_may_join_foreign_rooms() {
        let hub = RealtimeHub::new();
        let owner = Uuid::new_v4();
        let (client, mut rx_client) = hub.register(Uuid::new_v4(), RoleName::Client);
        let (staff, mut rx_staff) = hub.register(Uuid::new_v4(), RoleName::Secretary);

        let join = format!(r#"{{"type":"join_user_room","user_id":"{owner}"}}"#);
        hub.handle_inbound(&client.id, &join);
        hub.handle_inbound(&staff.id, &join);
        assert!(rx_client.recv().await.unwrap().contains("\"error\""));
        assert!(rx_staff.recv().await.unwrap().contains("roomJoined"));

        assert_eq!(hub.emit_to_user(owner, &event()), 1);
        assert_eq!(rx_staff.recv().await.unwrap(), event().to_text());
        assert!(rx_client.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_connections_are_pruned() {
        let hub = RealtimeHub::new();
        let user = Uuid::new_v4();
        let (_handle, rx) = hub.register(user, RoleName::Client);
        drop(rx);

        assert_eq!(hub.emit_to_user(user, &event()), 0);
        assert_eq!(hub.connection_count(), 0);
    }
}
