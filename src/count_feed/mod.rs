//! CountFeed - Message-Stream Entry Point
//!
//! ## Responsibilities
//!
//! - Single `on_event` entry point for the external message stream
//! - Parse payloads; malformed events are logged and dropped without
//!   touching existing totals
//! - Notify the wall loop through a watch revision so display refresh is
//!   marshaled onto the owning task, never done from the ingestion task
//!
//! The transport itself (connect/reconnect, room join) is an external
//! collaborator; whatever it is, it only ever calls `on_event`.

use crate::area_counts::{AreaCountAggregator, CountEvent};
use std::sync::Arc;
use tokio::sync::watch;

/// Count event intake, shared with the transport task
pub struct CountFeed {
    aggregator: Arc<AreaCountAggregator>,
    revision: watch::Sender<u64>,
}

impl CountFeed {
    pub fn new(aggregator: Arc<AreaCountAggregator>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            aggregator,
            revision,
        }
    }

    /// Revision channel bumped after every applied event
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Apply one raw payload from the message stream
    pub async fn on_event(&self, payload: serde_json::Value) {
        let event: CountEvent = match serde_json::from_value(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed count event dropped");
                return;
            }
        };
        if event.location_key.is_empty() {
            tracing::warn!("Count event without locationKey dropped");
            return;
        }
        self.aggregator.apply_event(event).await;
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Convenience for transports that deliver raw JSON text
    pub async fn on_text(&self, raw: &str) {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(payload) => self.on_event(payload).await,
            Err(e) => tracing::warn!(error = %e, "Unparseable count payload dropped"),
        }
    }
}
