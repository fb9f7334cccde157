//! MediaBackend - Playback Adapter
//!
//! ## Responsibilities
//!
//! - Minimal playback surface the core depends on:
//!   create / set_source / bind / play / stop / state
//!
//! The real player stack (VLC, GStreamer, go2rtc frontends...) implements
//! this trait; [`HeadlessBackend`] is the in-memory stand-in used by the
//! unattended binary and the tests. Decode and rendering are out of scope.

use crate::error::{Error, Result};
use crate::surface::RenderTargetId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Player options carried over from the production deployment
pub const DEFAULT_MEDIA_OPTIONS: &str =
    ":no-video-title-show :no-sub-autodetect-file :no-osd :network-caching=300";

/// Backend-reported playback state
///
/// Anything that is not actively playing or paused counts as `Other` and is
/// treated as unhealthy by the connection health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Playing,
    Paused,
    Other,
}

impl PlaybackState {
    pub fn is_healthy(self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

/// Opaque playback handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerHandle(pub u64);

/// Minimal media operations the core depends on
pub trait MediaBackend: Send + Sync {
    fn create_handle(&self) -> Result<PlayerHandle>;
    fn set_source(&self, handle: PlayerHandle, uri: &str, options: &str) -> Result<()>;
    fn bind(&self, handle: PlayerHandle, target: RenderTargetId) -> Result<()>;
    fn play(&self, handle: PlayerHandle) -> Result<()>;
    fn stop(&self, handle: PlayerHandle);
    fn state(&self, handle: PlayerHandle) -> PlaybackState;
}

struct HeadlessPlayer {
    uri: String,
    target: Option<RenderTargetId>,
    state: PlaybackState,
}

/// In-memory backend that reports Playing once played
pub struct HeadlessBackend {
    players: Mutex<HashMap<PlayerHandle, HeadlessPlayer>>,
    next_id: AtomicU64,
    handles_created: AtomicU64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            handles_created: AtomicU64::new(0),
        }
    }

    /// Total handles ever created (leak checks in tests)
    pub fn handles_created(&self) -> u64 {
        self.handles_created.load(Ordering::Relaxed)
    }

    /// Handles currently alive (not stopped-and-released)
    pub fn live_handles(&self) -> usize {
        self.players.lock().unwrap().len()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for HeadlessBackend {
    fn create_handle(&self) -> Result<PlayerHandle> {
        let handle = PlayerHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.players.lock().unwrap().insert(
            handle,
            HeadlessPlayer {
                uri: String::new(),
                target: None,
                state: PlaybackState::Other,
            },
        );
        self.handles_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(handle = handle.0, "Player handle created");
        Ok(handle)
    }

    fn set_source(&self, handle: PlayerHandle, uri: &str, options: &str) -> Result<()> {
        let mut players = self.players.lock().unwrap();
        let player = players
            .get_mut(&handle)
            .ok_or_else(|| Error::Media(format!("Unknown handle {}", handle.0)))?;
        player.uri = uri.to_string();
        tracing::debug!(handle = handle.0, uri = %uri, options = %options, "Source set");
        Ok(())
    }

    fn bind(&self, handle: PlayerHandle, target: RenderTargetId) -> Result<()> {
        let mut players = self.players.lock().unwrap();
        let player = players
            .get_mut(&handle)
            .ok_or_else(|| Error::Media(format!("Unknown handle {}", handle.0)))?;
        player.target = Some(target);
        tracing::debug!(handle = handle.0, target = target.0, "Player bound to target");
        Ok(())
    }

    fn play(&self, handle: PlayerHandle) -> Result<()> {
        let mut players = self.players.lock().unwrap();
        let player = players
            .get_mut(&handle)
            .ok_or_else(|| Error::Media(format!("Unknown handle {}", handle.0)))?;
        if player.uri.is_empty() {
            return Err(Error::Media(format!("Handle {} has no source", handle.0)));
        }
        player.state = PlaybackState::Playing;
        tracing::debug!(handle = handle.0, uri = %player.uri, "Playback started");
        Ok(())
    }

    fn stop(&self, handle: PlayerHandle) {
        if self.players.lock().unwrap().remove(&handle).is_some() {
            tracing::debug!(handle = handle.0, "Player stopped and released");
        }
    }

    fn state(&self, handle: PlayerHandle) -> PlaybackState {
        self.players
            .lock()
            .unwrap()
            .get(&handle)
            .map(|p| p.state)
            .unwrap_or(PlaybackState::Other)
    }
}
