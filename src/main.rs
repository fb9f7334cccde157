//! Camwall - Surveillance Video Wall
//!
//! Headless entry point: builds one tiled group per camera area, keeps every
//! stream alive with rate-limited reconnects, and folds count events from the
//! message stream into per-area totals. Rendering and the real stream
//! transport are external collaborators; this binary wires the headless
//! adapters and reads count events as JSON lines on stdin.

use camwall::area_counts::AreaCountAggregator;
use camwall::count_feed::CountFeed;
use camwall::location_directory::LocationDirectory;
use camwall::media_backend::{HeadlessBackend, MediaBackend};
use camwall::sources;
use camwall::surface::{HeadlessSurface, RenderSurface};
use camwall::wall::VideoWall;
use camwall::AppConfig;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "camwall=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Camwall v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::default();
    tracing::info!(
        camera_list = %config.camera_list.display(),
        location_map = %config.location_map.display(),
        surface_width = config.surface_width,
        surface_height = config.surface_height,
        "Configuration loaded"
    );

    // Location directory is optional; unmapped locations degrade to
    // placeholder areas instead of being dropped
    let directory = match LocationDirectory::load(&config.location_map) {
        Ok(directory) => Arc::new(directory),
        Err(e) => {
            tracing::warn!(error = %e, "Location map unavailable - all locations will be unmapped");
            Arc::new(LocationDirectory::default())
        }
    };

    // Camera list is not optional: zero groups means a meaningless display
    let cameras = sources::load_camera_list(&config.camera_list)?;
    let grouped = sources::group_by_area(cameras);

    let backend: Arc<dyn MediaBackend> = Arc::new(HeadlessBackend::new());
    let surface: Arc<dyn RenderSurface> = Arc::new(HeadlessSurface::new(
        config.surface_width,
        config.surface_height,
    ));
    let aggregator = Arc::new(AreaCountAggregator::new(directory));
    let feed = Arc::new(CountFeed::new(aggregator.clone()));
    let refresh = feed.subscribe();

    let mut wall = VideoWall::new(
        grouped,
        backend,
        surface,
        aggregator,
        config.side_panel_width,
    )?;

    // Ingestion task: the real deployment hands `feed.on_event` to the
    // message-stream transport; headless builds take JSON lines on stdin
    tokio::spawn(ingest_stdin(feed));

    wall.run(refresh, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;

    tracing::info!("Camwall stopped");
    Ok(())
}

/// Feed count events from stdin, one JSON payload per line
async fn ingest_stdin(feed: Arc<CountFeed>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if !line.is_empty() {
                    feed.on_text(line).await;
                }
            }
            Ok(None) => {
                tracing::info!("Count feed input closed");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Count feed read error");
                return;
            }
        }
    }
}
