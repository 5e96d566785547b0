//! Audit log middleware.
//!
//! Successful mutating requests on posts, categories, users and auth are
//! appended to the `logs` table. Request bodies are never recorded.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::json;
use uuid::Uuid;

use verrou_entity::log::{CreateLog, LogAction, LogEntity, entity_id_from_path};

use crate::extractors::client::{bearer_token, client_ip, user_agent};
use crate::state::AppState;

/// What a request would be logged as, if it gets logged at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub action: LogAction,
    pub entity: LogEntity,
    pub entity_id: Option<Uuid>,
}

pub fn classify(method: &str, path: &str) -> Option<Classification> {
    let action = LogAction::from_method(method)?;
    if !LogEntity::is_audited_path(path) {
        return None;
    }
    Some(Classification {
        action,
        entity: LogEntity::from_path(path),
        entity_id: entity_id_from_path(path),
    })
}

pub async fn audit_log(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let Some(class) = classify(&method, &path) else {
        return next.run(request).await;
    };

    let url = request.uri().to_string();
    let user_id = bearer_token(request.headers())
        .and_then(|token| state.jwt_decoder.decode(&token).ok())
        .map(|claims| claims.user_id());
    let ip_address = client_ip(request.headers(), request.extensions());
    let user_agent = user_agent(request.headers());

    let response = next.run(request).await;

    if response.status().is_success() {
        state.log_service.record(CreateLog {
            action: class.action,
            entity: class.entity,
            entity_id: class.entity_id,
            user_id,
            details: Some(json!({ "method": method, "url": url })),
            ip_address: Some(ip_address),
            user_agent,
        });
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_unaudited_paths_are_skipped() {
        assert_eq!(classify("GET", "/api/posts"), None);
        assert_eq!(classify("POST", "/api/assets"), None);
        assert_eq!(classify("DELETE", "/api/logs/cleanup"), None);
    }

    #[test]
    fn mutations_are_classified() {
        let id = Uuid::new_v4();
        let class = classify("PATCH", &format!("/api/categories/{id}")).unwrap();
        assert_eq!(class.action, LogAction::Update);
        assert_eq!(class.entity, LogEntity::Category);
        assert_eq!(class.entity_id, Some(id));

        let class = classify("POST", "/api/auth/login").unwrap();
        assert_eq!(class.action, LogAction::Create);
        assert_eq!(class.entity, LogEntity::Auth);
        assert_eq!(class.entity_id, None);
    }
}
