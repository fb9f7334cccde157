//! StreamConnection - Per-Stream Lifecycle
//!
//! ## Responsibilities
//!
//! - Connect one camera stream through the media backend
//! - Detect stalled/dead playback on a fixed health-check cadence
//! - Reconnect with rate-limited attempts, forever
//!
//! There is no terminal failure state: an unreachable source cycles
//! Connecting -> Stalled -> Connecting at the bounded cadence for as long as
//! the owning group exists. No failure ever escapes this module; callers see
//! only the `ConnectionState` field. The owning group task is the sole
//! caller, which together with the inter-attempt spacing guard keeps at most
//! one attempt in flight per stream.

use crate::error::Result;
use crate::media_backend::{MediaBackend, PlayerHandle, DEFAULT_MEDIA_OPTIONS};
use crate::sources::CameraSource;
use crate::surface::RenderTargetId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Health check cadence
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(2);
/// Unhealthy-for-this-long triggers a reconnect
pub const RECONNECT_THRESHOLD: Duration = Duration::from_secs(5);
/// Minimum spacing between attempts; calls inside the window are no-ops
pub const MIN_ATTEMPT_SPACING: Duration = Duration::from_secs(1);

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Never started (permanent for sources with an empty URI)
    Idle,
    /// Attempt issued, waiting for the backend to report playback
    Connecting,
    /// Backend reports playing or paused
    Live,
    /// Was live, playback died; waiting out the reconnect threshold
    Stalled,
    /// Reconnect triggered, tearing down and re-issuing play
    Reconnecting,
}

/// One stream's playback lifecycle
pub struct StreamConnection {
    source: CameraSource,
    backend: Arc<dyn MediaBackend>,
    target: RenderTargetId,
    handle: Option<PlayerHandle>,
    state: ConnectionState,
    last_attempt: Option<Instant>,
    attempts: u64,
    shut_down: bool,
}

impl StreamConnection {
    pub fn new(
        source: CameraSource,
        backend: Arc<dyn MediaBackend>,
        target: RenderTargetId,
    ) -> Self {
        Self {
            source,
            backend,
            target,
            handle: None,
            state: ConnectionState::Idle,
            last_attempt: None,
            attempts: 0,
            shut_down: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn source(&self) -> &CameraSource {
        &self.source
    }

    pub fn target(&self) -> RenderTargetId {
        self.target
    }

    /// Connect attempts issued so far (monitoring)
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Begin playback. Sources with an empty URI stay Idle permanently.
    pub fn start(&mut self) {
        if self.source.uri.is_empty() {
            tracing::warn!(
                camera = %self.source.display_name,
                "Camera has no source URI - staying idle"
            );
            return;
        }
        self.state = ConnectionState::Connecting;
        self.attempt_play();
    }

    /// Periodic health check, driven by the owning group every
    /// [`HEALTH_CHECK_INTERVAL`]
    pub fn health_check(&mut self) {
        if self.shut_down || self.state == ConnectionState::Idle {
            return;
        }

        let backend_state = self
            .handle
            .map(|h| self.backend.state(h))
            .unwrap_or(crate::media_backend::PlaybackState::Other);

        if backend_state.is_healthy() {
            if self.state != ConnectionState::Live {
                tracing::info!(camera = %self.source.display_name, "Stream live");
            }
            self.state = ConnectionState::Live;
            return;
        }

        if self.state == ConnectionState::Live {
            tracing::warn!(camera = %self.source.display_name, "Stream stalled");
            self.state = ConnectionState::Stalled;
        }

        let threshold_passed = match self.last_attempt {
            Some(at) => at.elapsed() > RECONNECT_THRESHOLD,
            None => true,
        };
        if threshold_passed {
            self.reconnect();
        }
    }

    /// Tear down the current handle and re-issue play, unless an attempt
    /// happened within [`MIN_ATTEMPT_SPACING`] (silent no-op in that window)
    pub fn reconnect(&mut self) {
        if self.shut_down || self.state == ConnectionState::Idle || self.within_spacing() {
            return;
        }
        self.state = ConnectionState::Reconnecting;
        self.attempt_play();
    }

    fn within_spacing(&self) -> bool {
        self.last_attempt
            .is_some_and(|last| last.elapsed() < MIN_ATTEMPT_SPACING)
    }

    /// Issue a connect attempt unless one happened within
    /// [`MIN_ATTEMPT_SPACING`]
    fn attempt_play(&mut self) {
        if self.within_spacing() {
            return;
        }
        self.last_attempt = Some(Instant::now());
        self.attempts += 1;

        match self.try_play() {
            Ok(()) => {
                self.state = ConnectionState::Connecting;
            }
            Err(e) => {
                // Absorbed; the next health tick retries
                tracing::error!(
                    camera = %self.source.display_name,
                    error = %e,
                    "Playback attempt failed"
                );
                self.state = ConnectionState::Stalled;
            }
        }
    }

    fn try_play(&mut self) -> Result<()> {
        if let Some(old) = self.handle.take() {
            self.backend.stop(old);
        }
        let handle = self.backend.create_handle()?;
        self.backend
            .set_source(handle, &self.source.uri, DEFAULT_MEDIA_OPTIONS)?;
        self.backend.bind(handle, self.target)?;
        self.backend.play(handle)?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop playback and release the handle. Idempotent; no retry fires
    /// after this returns.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        if let Some(handle) = self.handle.take() {
            self.backend.stop(handle);
            tracing::info!(camera = %self.source.display_name, "Stream shut down");
        }
        self.state = ConnectionState::Idle;
    }
}
