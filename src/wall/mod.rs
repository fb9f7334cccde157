//! VideoWall - Single-Owner Orchestration Loop
//!
//! ## Responsibilities
//!
//! - Own every GroupController (the UI-thread stand-in: all surface and
//!   connection mutation happens on this one task)
//! - Drive health checks on the fixed cadence
//! - React to count-feed revisions by toggling area panels (a panel is shown
//!   only once its area has totals; each toggle forces a relayout)
//! - Graceful shutdown: stop the loop first, then every group, so no retry
//!   fires afterwards
//!
//! The ingestion task never touches rendering; it only writes through the
//! aggregator lock and bumps the watch revision that this loop observes.

use crate::area_counts::AreaCountAggregator;
use crate::group_controller::GroupController;
use crate::media_backend::MediaBackend;
use crate::sources::CameraSource;
use crate::stream_connection::HEALTH_CHECK_INTERVAL;
use crate::surface::RenderSurface;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// The whole wall: one group per area, plus the count aggregation view
pub struct VideoWall {
    groups: Vec<GroupController>,
    aggregator: Arc<AreaCountAggregator>,
    shut_down: bool,
}

impl std::fmt::Debug for VideoWall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoWall")
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl VideoWall {
    /// Build one group per area, in grouping order. Zero groups is a fatal
    /// configuration error: the display would be meaningless.
    pub fn new(
        grouped: Vec<(String, Vec<CameraSource>)>,
        backend: Arc<dyn MediaBackend>,
        surface: Arc<dyn RenderSurface>,
        aggregator: Arc<AreaCountAggregator>,
        side_panel_width: u32,
    ) -> crate::Result<Self> {
        if grouped.is_empty() {
            return Err(crate::Error::Config(
                "No camera groups configured".to_string(),
            ));
        }
        let groups = grouped
            .into_iter()
            .map(|(area, streams)| {
                GroupController::new(
                    area,
                    streams,
                    backend.clone(),
                    surface.clone(),
                    side_panel_width,
                )
            })
            .collect::<crate::Result<Vec<_>>>()?;

        tracing::info!(groups = groups.len(), "Video wall assembled");
        Ok(Self {
            groups,
            aggregator,
            shut_down: false,
        })
    }

    pub fn groups(&self) -> &[GroupController] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [GroupController] {
        &mut self.groups
    }

    /// Show each group's panel iff its area currently has totals
    pub async fn refresh_panels(&mut self) {
        for group in &mut self.groups {
            let visible = self.aggregator.area_totals(group.area()).await.is_some();
            group.set_panel_visible(visible);
        }
    }

    /// Run until `shutdown_signal` resolves, multiplexing health ticks and
    /// feed revisions. Shuts every group down before returning.
    pub async fn run(
        &mut self,
        mut refresh: watch::Receiver<u64>,
        shutdown_signal: impl Future<Output = ()>,
    ) {
        let mut health = tokio::time::interval(HEALTH_CHECK_INTERVAL);
        let mut feed_open = true;
        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                _ = health.tick() => {
                    for group in &mut self.groups {
                        group.health_tick();
                    }
                }
                changed = refresh.changed(), if feed_open => {
                    match changed {
                        Ok(()) => self.refresh_panels().await,
                        Err(_) => {
                            // Feed gone; keep the wall alive on health ticks
                            tracing::warn!("Count feed closed");
                            feed_open = false;
                        }
                    }
                }
                _ = shutdown_signal.as_mut() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }
        self.shutdown();
    }

    /// Stop every group. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        for group in &mut self.groups {
            group.shutdown();
        }
        tracing::info!("Video wall stopped");
    }
}
