use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::engine::VisibilitySyncEngine;

/// Unique identifier for a connected client (one per connection, stable
/// for the connection's lifetime).
pub type ClientId = Uuid;

/// Visibility notification produced by the event-delivery subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisibilityEvent {
    /// A client toggled into the hidden state.
    Hidden {
        client_id: ClientId,
        timestamp: DateTime<Utc>,
    },
    /// A client toggled back to visible.
    Revealed {
        client_id: ClientId,
        timestamp: DateTime<Utc>,
    },
}

/// Dispatch visibility notifications into the engine until the channel
/// closes. The engine instance is injected by the caller; there is no
/// global singleton.
pub async fn run_event_bridge(
    engine: VisibilitySyncEngine,
    mut rx: mpsc::UnboundedReceiver<VisibilityEvent>,
) {
    while let Some(event) = rx.recv().await {
        match event {
            VisibilityEvent::Hidden {
                client_id,
                timestamp,
            } => {
                debug!(%client_id, %timestamp, "hide notification");
                engine.on_hide(client_id);
            }
            VisibilityEvent::Revealed {
                client_id,
                timestamp,
            } => {
                debug!(%client_id, %timestamp, "unhide notification");
                engine.on_unhide(client_id);
            }
        }
    }
}
