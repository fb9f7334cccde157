//! RenderSurface - Rendering Surface Adapter
//!
//! ## Responsibilities
//!
//! - Render target creation for tiles (streams and blank padding alike)
//! - Target geometry updates (the only rendering side effect the core has)
//! - Surface size queries for layout computation
//!
//! The real window system implements this trait; [`HeadlessSurface`] is the
//! in-memory stand-in used by the headless binary and the tests.

use crate::layout::Rect;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Opaque render target reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u64);

/// Minimal surface operations the core depends on
pub trait RenderSurface: Send + Sync {
    /// Create a new render target (tile)
    fn create_target(&self) -> RenderTargetId;

    /// Move/resize a target to an absolute rectangle
    fn set_region(&self, target: RenderTargetId, rect: Rect);

    /// Current usable surface size (width, height)
    fn available_size(&self) -> (u32, u32);
}

/// In-memory surface that records target geometry
pub struct HeadlessSurface {
    size: Mutex<(u32, u32)>,
    regions: Mutex<HashMap<RenderTargetId, Rect>>,
    next_id: AtomicU64,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Mutex::new((width, height)),
            regions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Simulate a surface resize (the embedder calls this, then notifies
    /// the owning group via `on_surface_resized`)
    pub fn set_size(&self, width: u32, height: u32) {
        *self.size.lock().unwrap() = (width, height);
    }

    /// Last applied rectangle for a target
    pub fn region(&self, target: RenderTargetId) -> Option<Rect> {
        self.regions.lock().unwrap().get(&target).copied()
    }

    pub fn target_count(&self) -> usize {
        self.regions.lock().unwrap().len()
    }
}

impl RenderSurface for HeadlessSurface {
    fn create_target(&self) -> RenderTargetId {
        let id = RenderTargetId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.regions.lock().unwrap().insert(
            id,
            Rect {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            },
        );
        tracing::debug!(target = id.0, "Render target created");
        id
    }

    fn set_region(&self, target: RenderTargetId, rect: Rect) {
        self.regions.lock().unwrap().insert(target, rect);
        tracing::trace!(
            target = target.0,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Render target repositioned"
        );
    }

    fn available_size(&self) -> (u32, u32) {
        *self.size.lock().unwrap()
    }
}
