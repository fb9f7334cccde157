//! Camwall - Surveillance Video Wall Core
//!
//! Drives a wall of surveillance monitors: camera streams are grouped by
//! physical area, each group is tiled into an adaptive gap-free grid, and a
//! side panel shows live head-counts per area fed by an external event stream.
//!
//! ## Architecture (9 Components)
//!
//! 1. Layout - boundary partitioning, tile topologies, rectangle computation
//! 2. MediaBackend - minimal playback adapter (create/bind/play/stop/state)
//! 3. RenderSurface - render target geometry adapter
//! 4. StreamConnection - per-stream lifecycle with rate-limited reconnect
//! 5. GroupController - one area's tiled group of streams
//! 6. LocationDirectory - static locationKey -> name/area lookup
//! 7. AreaCountAggregator - last-write-wins per-location count reducer
//! 8. CountFeed - message-stream entry point (parse, drop malformed, notify)
//! 9. VideoWall - single-owner orchestration loop (the UI-thread stand-in)
//!
//! ## Design Principles
//!
//! - Per-stream and per-event failures never cross their component boundary
//! - A group's connections are owned by one task; only the aggregator map
//!   is shared mutable state
//! - Layout recomputation is pure; only the owner applies it to the surface

pub mod area_counts;
pub mod count_feed;
pub mod error;
pub mod group_controller;
pub mod layout;
pub mod location_directory;
pub mod media_backend;
pub mod sources;
pub mod state;
pub mod stream_connection;
pub mod surface;
pub mod wall;

pub use error::{Error, Result};
pub use state::AppConfig;
