//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use verrou_auth::Claims;
use verrou_core::error::AppError;

use crate::dto::request::WsQuery;
use crate::error::ApiResult;
use crate::extractors::QueryParams;
use crate::state::AppState;

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    QueryParams(query): QueryParams<WsQuery>,
) -> ApiResult<Response> {
    // Authenticate before upgrade
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing token"))?;
    let claims = state.jwt_decoder.decode(&token)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, claims, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_socket(state: AppState, claims: Claims, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.realtime.register(claims.user_id(), claims.role);
    let conn_id = handle.id;

    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => state.realtime.handle_inbound(&conn_id, text.as_str()),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.realtime.unregister(&conn_id);
    debug!(conn_id = %conn_id, "WebSocket handler finished");
}
