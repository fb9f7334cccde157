//! AreaCountAggregator - Realtime Head-Counts per Area
//!
//! ## Responsibilities
//!
//! - Store the latest count event per location (overwrite, last-write-wins)
//! - Resolve locations to areas through the static directory
//! - Recompute per-area totals on read
//!
//! A location that stops sending keeps contributing its last known counts;
//! there is intentionally no expiry. Unmapped locations are folded into a
//! synthesized placeholder area so unmapped sources stay visible to the
//! operator instead of being dropped.
//!
//! Totals are recomputed on every read rather than maintained incrementally.
//! Query rate is tied to the UI refresh (~1/sec), far below the event rate,
//! so the scan is cheap and there are no cross-update invariants to keep.

use crate::location_directory::LocationDirectory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Most recent recognitions kept per area
pub const RECENT_RECOGNITION_CAP: usize = 20;

/// One recognized person attached to a count event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSighting {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub score: f64,
}

impl PersonSighting {
    /// Only displayable sightings make it into area totals
    pub fn is_displayable(&self) -> bool {
        !self.name.is_empty() && !self.image_ref.is_empty() && self.score > 0.0
    }
}

/// The three head-count categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(default)]
    pub prisoner: i64,
    #[serde(default)]
    pub officer: i64,
    #[serde(default)]
    pub relative: i64,
}

/// Inbound count event, stored verbatim as the latest snapshot for its key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountEvent {
    pub location_key: String,
    pub counts: Counts,
    #[serde(default)]
    pub recent_persons: Vec<PersonSighting>,
}

/// Aggregated totals for one area, recomputed on read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaTotals {
    pub area: String,
    pub prisoner_count: i64,
    pub officer_count: i64,
    pub relative_count: i64,
    pub recent_recognitions: Vec<PersonSighting>,
    pub last_updated: DateTime<Utc>,
}

struct LocationSnapshot {
    event: CountEvent,
    received_at: DateTime<Utc>,
}

/// Concurrent key-value reducer over count events
pub struct AreaCountAggregator {
    directory: Arc<LocationDirectory>,
    /// Latest snapshot per locationKey
    snapshots: RwLock<HashMap<String, LocationSnapshot>>,
}

impl AreaCountAggregator {
    pub fn new(directory: Arc<LocationDirectory>) -> Self {
        Self {
            directory,
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Area label for a location key, synthesizing a placeholder for
    /// keys missing from the directory
    pub fn resolve_area(&self, location_key: &str) -> String {
        match self.directory.area_of(location_key) {
            Some(area) => area.to_string(),
            None => placeholder_area(location_key),
        }
    }

    /// Store `event` as the latest snapshot for its location (overwrite)
    pub async fn apply_event(&self, event: CountEvent) {
        let area = self.resolve_area(&event.location_key);
        tracing::debug!(
            location_key = %event.location_key,
            area = %area,
            prisoner = event.counts.prisoner,
            officer = event.counts.officer,
            relative = event.counts.relative,
            "Count event applied"
        );
        self.snapshots.write().await.insert(
            event.location_key.clone(),
            LocationSnapshot {
                event,
                received_at: Utc::now(),
            },
        );
    }

    /// Totals for one area, or None when no received event maps to it
    /// (drives side-panel visibility)
    pub async fn area_totals(&self, area: &str) -> Option<AreaTotals> {
        let snapshots = self.snapshots.read().await;

        let mut matched: Vec<&LocationSnapshot> = snapshots
            .values()
            .filter(|snap| self.resolve_area(&snap.event.location_key) == area)
            .collect();
        if matched.is_empty() {
            return None;
        }
        // Most recent snapshots contribute their recognitions first
        matched.sort_by(|a, b| b.received_at.cmp(&a.received_at));

        let mut totals = AreaTotals {
            area: area.to_string(),
            prisoner_count: 0,
            officer_count: 0,
            relative_count: 0,
            recent_recognitions: Vec::new(),
            last_updated: matched[0].received_at,
        };
        for snap in matched {
            totals.prisoner_count += snap.event.counts.prisoner;
            totals.officer_count += snap.event.counts.officer;
            totals.relative_count += snap.event.counts.relative;
            totals.recent_recognitions.extend(
                snap.event
                    .recent_persons
                    .iter()
                    .filter(|p| p.is_displayable())
                    .cloned(),
            );
        }
        totals.recent_recognitions.truncate(RECENT_RECOGNITION_CAP);
        Some(totals)
    }

    /// Every area with at least one received event, sorted by name
    pub async fn all_areas(&self) -> Vec<String> {
        let snapshots = self.snapshots.read().await;
        let mut areas: Vec<String> = snapshots
            .values()
            .map(|snap| self.resolve_area(&snap.event.location_key))
            .collect();
        areas.sort();
        areas.dedup();
        areas
    }

    /// Sum over every stored location regardless of area
    pub async fn grand_totals(&self) -> Counts {
        let snapshots = self.snapshots.read().await;
        let mut totals = Counts::default();
        for snap in snapshots.values() {
            totals.prisoner += snap.event.counts.prisoner;
            totals.officer += snap.event.counts.officer;
            totals.relative += snap.event.counts.relative;
        }
        totals
    }
}

/// Deterministic label for locations missing from the directory
fn placeholder_area(location_key: &str) -> String {
    let prefix: String = location_key.chars().take(8).collect();
    format!("UNKNOWN_AREA ({prefix}...)")
}
