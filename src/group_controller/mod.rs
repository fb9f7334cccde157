//! GroupController - One Area's Tiled Stream Group
//!
//! ## Responsibilities
//!
//! - Own the StreamConnections of one area (truncated to 6 streams)
//! - Build the tile topology and apply rectangles to the surface
//! - Re-apply layout on resize, fullscreen toggle, and side-panel visibility
//! - Idempotent shutdown that releases every owned handle
//!
//! Padding slots (blank tiles in 2-, 3- and 5-stream groups) get a render
//! target at construction and keep it for the group's lifetime; they never
//! carry a stream or a connection. Resizing only re-homes targets - playback
//! handles are never created or destroyed by layout.

use crate::layout::{compute_rectangles, Rect, Topology};
use crate::media_backend::MediaBackend;
use crate::sources::CameraSource;
use crate::stream_connection::{ConnectionState, StreamConnection};
use crate::surface::{RenderSurface, RenderTargetId};
use std::sync::Arc;

/// Hard cap per group; extra streams are dropped in original order
pub const MAX_STREAMS_PER_GROUP: usize = 6;

/// One slot's current binding, for display/inspection
#[derive(Debug, Clone)]
pub struct SlotBinding {
    pub slot_index: usize,
    /// None for padding slots
    pub stream: Option<CameraSource>,
    pub rectangle: Rect,
    /// None for padding slots
    pub state: Option<ConnectionState>,
}

/// Controller for one area's group of streams
pub struct GroupController {
    area: String,
    topology: Topology,
    surface: Arc<dyn RenderSurface>,
    /// One target per topology slot, padding included
    targets: Vec<RenderTargetId>,
    /// Index-aligned with targets; None = padding slot
    connections: Vec<Option<StreamConnection>>,
    rectangles: Vec<Rect>,
    surface_size: (u32, u32),
    side_panel_width: u32,
    panel_visible: bool,
    fullscreen: bool,
    shut_down: bool,
}

impl std::fmt::Debug for GroupController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupController")
            .field("area", &self.area)
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl GroupController {
    pub fn new(
        area: String,
        mut streams: Vec<CameraSource>,
        backend: Arc<dyn MediaBackend>,
        surface: Arc<dyn RenderSurface>,
        side_panel_width: u32,
    ) -> crate::Result<Self> {
        if streams.is_empty() {
            return Err(crate::Error::Config(format!(
                "Group '{area}' has no streams"
            )));
        }
        if streams.len() > MAX_STREAMS_PER_GROUP {
            tracing::warn!(
                area = %area,
                count = streams.len(),
                cap = MAX_STREAMS_PER_GROUP,
                "Group exceeds stream cap - truncating"
            );
            streams.truncate(MAX_STREAMS_PER_GROUP);
        }

        let topology = Topology::for_stream_count(streams.len());
        let targets: Vec<RenderTargetId> = (0..topology.slot_count())
            .map(|_| surface.create_target())
            .collect();

        let mut streams = streams.into_iter();
        let connections: Vec<Option<StreamConnection>> = targets
            .iter()
            .enumerate()
            .map(|(slot, target)| {
                if topology.is_padding(slot) {
                    None
                } else {
                    let stream = streams.next().expect("occupied slot without stream");
                    let mut conn = StreamConnection::new(stream, backend.clone(), *target);
                    conn.start();
                    Some(conn)
                }
            })
            .collect();

        let surface_size = surface.available_size();
        let mut group = Self {
            area,
            topology,
            surface,
            targets,
            connections,
            rectangles: Vec::new(),
            surface_size,
            side_panel_width,
            panel_visible: false,
            fullscreen: true,
            shut_down: false,
        };
        group.apply_layout();
        tracing::info!(
            area = %group.area,
            streams = group.stream_count(),
            slots = group.topology.slot_count(),
            "Group assembled"
        );
        Ok(group)
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    /// Window title, production format
    pub fn title(&self) -> String {
        format!("Camera Group: {} ({} cams)", self.area, self.stream_count())
    }

    pub fn stream_count(&self) -> usize {
        self.topology.occupied()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Width x height actually available for tiles (side panel subtracted)
    fn usable_size(&self) -> (u32, u32) {
        let (width, height) = self.surface_size;
        if self.panel_visible {
            (width.saturating_sub(self.side_panel_width), height)
        } else {
            (width, height)
        }
    }

    /// Recompute rectangles and re-home every target. Idempotent; never
    /// touches playback handles.
    fn apply_layout(&mut self) {
        let (width, height) = self.usable_size();
        self.rectangles = compute_rectangles(width, height, &self.topology);
        for (target, rect) in self.targets.iter().zip(&self.rectangles) {
            self.surface.set_region(*target, *rect);
        }
        tracing::debug!(
            area = %self.area,
            width,
            height,
            panel = self.panel_visible,
            "Layout applied"
        );
    }

    /// Surface geometry changed
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        if self.shut_down {
            return;
        }
        self.surface_size = (width, height);
        self.apply_layout();
    }

    /// Ctrl+F style fullscreen toggle; geometry comes back through the
    /// surface adapter
    pub fn on_toggle_fullscreen(&mut self) {
        if self.shut_down {
            return;
        }
        self.fullscreen = !self.fullscreen;
        self.surface_size = self.surface.available_size();
        self.apply_layout();
    }

    /// Show/hide the area side panel; a width change, not a topology change
    pub fn set_panel_visible(&mut self, visible: bool) {
        if self.shut_down || self.panel_visible == visible {
            return;
        }
        self.panel_visible = visible;
        self.apply_layout();
    }

    /// Run every connection's health check (one tick)
    pub fn health_tick(&mut self) {
        if self.shut_down {
            return;
        }
        for conn in self.connections.iter_mut().flatten() {
            conn.health_check();
        }
    }

    /// Stop every owned stream and release backend handles. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        for conn in self.connections.iter_mut().flatten() {
            conn.shutdown();
        }
        tracing::info!(area = %self.area, "Group shut down");
    }

    /// Current slot -> (stream, rectangle, state) view
    pub fn slot_bindings(&self) -> Vec<SlotBinding> {
        self.connections
            .iter()
            .enumerate()
            .map(|(slot_index, conn)| SlotBinding {
                slot_index,
                stream: conn.as_ref().map(|c| c.source().clone()),
                rectangle: self.rectangles[slot_index],
                state: conn.as_ref().map(|c| c.state()),
            })
            .collect()
    }
}
