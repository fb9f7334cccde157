//! End-to-end wall pipeline test
//!
//! Camera list -> area grouping -> wall assembly -> count events ->
//! panel visibility and relayout, all against the headless adapters.

use camwall::area_counts::AreaCountAggregator;
use camwall::count_feed::CountFeed;
use camwall::location_directory::{LocationDirectory, LocationEntry};
use camwall::media_backend::HeadlessBackend;
use camwall::sources::{group_by_area, CameraSource};
use camwall::stream_connection::ConnectionState;
use camwall::surface::HeadlessSurface;
use camwall::wall::VideoWall;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn camera_list() -> Vec<CameraSource> {
    let raw = json!([
        { "uri": "rtsp://cams/a11", "area": "CELL BLOCK", "displayName": "A11", "locationKey": "L-cell-1" },
        { "uri": "rtsp://cams/a12", "area": "CELL BLOCK", "displayName": "A12", "locationKey": "L-cell-2" },
        { "uri": "rtsp://cams/b11", "area": "NORTH FENCE", "displayName": "B11" },
        { "uri": "rtsp://cams/b12", "area": "NORTH FENCE", "displayName": "B12" },
        { "uri": "rtsp://cams/b13", "area": "NORTH FENCE", "displayName": "B13" },
        { "uri": "rtsp://cams/b14", "area": "NORTH FENCE", "displayName": "B14" },
        { "uri": "rtsp://cams/b15", "area": "NORTH FENCE", "displayName": "B15" },
        { "uri": "rtsp://cams/b16", "area": "NORTH FENCE", "displayName": "B16" },
        { "uri": "rtsp://cams/d11", "area": "MAIN GATE", "displayName": "D11", "locationKey": "L-gate-1" }
    ]);
    serde_json::from_value(raw).unwrap()
}

fn directory() -> Arc<LocationDirectory> {
    let mut entries = HashMap::new();
    for (key, name, area) in [
        ("L-cell-1", "Cell block 01", "CELL BLOCK"),
        ("L-cell-2", "Cell block 02", "CELL BLOCK"),
        ("L-gate-1", "Main gate 01", "MAIN GATE"),
    ] {
        entries.insert(
            key.to_string(),
            LocationEntry {
                display_name: name.to_string(),
                area: area.to_string(),
            },
        );
    }
    Arc::new(LocationDirectory::from_entries(entries))
}

#[tokio::test]
async fn wall_assembles_grouped_by_area() {
    let grouped = group_by_area(camera_list());
    let aggregator = Arc::new(AreaCountAggregator::new(directory()));
    let backend = Arc::new(HeadlessBackend::new());
    let surface = Arc::new(HeadlessSurface::new(1920, 1080));

    let wall = VideoWall::new(grouped, backend.clone(), surface, aggregator, 320).unwrap();

    // First-occurrence order, fence crop to 6
    let areas: Vec<&str> = wall.groups().iter().map(|g| g.area()).collect();
    assert_eq!(areas, vec!["CELL BLOCK", "NORTH FENCE", "MAIN GATE"]);
    assert_eq!(wall.groups()[0].stream_count(), 2);
    assert_eq!(wall.groups()[1].stream_count(), 6);
    assert_eq!(wall.groups()[2].stream_count(), 1);

    // 2 + 6 + 1 streams = 9 playback handles; padding tiles get none
    assert_eq!(backend.handles_created(), 9);

    // Each group's rectangles exactly cover the surface
    for group in wall.groups() {
        let total: u64 = group
            .slot_bindings()
            .iter()
            .map(|b| b.rectangle.area())
            .sum();
        assert_eq!(total, 1920 * 1080, "area {}", group.area());
    }
}

#[tokio::test]
async fn count_events_drive_panels_and_relayout() {
    let grouped = group_by_area(camera_list());
    let aggregator = Arc::new(AreaCountAggregator::new(directory()));
    let backend = Arc::new(HeadlessBackend::new());
    let surface = Arc::new(HeadlessSurface::new(1920, 1080));
    let mut wall = VideoWall::new(grouped, backend, surface, aggregator.clone(), 320).unwrap();
    let feed = CountFeed::new(aggregator.clone());

    // Two locations of the same area accumulate; re-sends overwrite
    feed.on_event(json!({
        "locationKey": "L-cell-1",
        "counts": { "prisoner": 3, "officer": 1, "relative": 0 }
    }))
    .await;
    feed.on_event(json!({
        "locationKey": "L-cell-2",
        "counts": { "prisoner": 0, "officer": 2, "relative": 1 },
        "recentPersons": [
            { "name": "Nguyen Van A", "imageRef": "img/a.jpg", "score": 0.93 },
            { "name": "", "imageRef": "img/x.jpg", "score": 0.99 }
        ]
    }))
    .await;

    let totals = aggregator.area_totals("CELL BLOCK").await.unwrap();
    assert_eq!(
        (
            totals.prisoner_count,
            totals.officer_count,
            totals.relative_count
        ),
        (3, 3, 1)
    );
    assert_eq!(totals.recent_recognitions.len(), 1);

    feed.on_event(json!({
        "locationKey": "L-cell-1",
        "counts": { "prisoner": 5, "officer": 0, "relative": 0 }
    }))
    .await;
    let totals = aggregator.area_totals("CELL BLOCK").await.unwrap();
    assert_eq!(
        (
            totals.prisoner_count,
            totals.officer_count,
            totals.relative_count
        ),
        (5, 2, 1)
    );

    // Panel appears only for the area with totals, shrinking its tiles
    wall.refresh_panels().await;
    let cell_block = &wall.groups()[0];
    assert!(cell_block.panel_visible());
    let width: u32 = {
        let bindings = cell_block.slot_bindings();
        bindings[0].rectangle.width + bindings[1].rectangle.width
    };
    assert_eq!(width, 1600);
    assert!(!wall.groups()[1].panel_visible());

    // An event from an unmapped source is visible, not dropped
    feed.on_event(json!({
        "locationKey": "ZZZ-rogue-sensor",
        "counts": { "prisoner": 1, "officer": 0, "relative": 0 }
    }))
    .await;
    let areas = aggregator.all_areas().await;
    assert!(areas.iter().any(|a| a.starts_with("UNKNOWN_AREA (ZZZ-rogu")));
}

#[tokio::test]
async fn shutdown_releases_every_handle_once() {
    let grouped = group_by_area(camera_list());
    let aggregator = Arc::new(AreaCountAggregator::new(directory()));
    let backend = Arc::new(HeadlessBackend::new());
    let surface = Arc::new(HeadlessSurface::new(1920, 1080));
    let mut wall = VideoWall::new(grouped, backend.clone(), surface, aggregator, 320).unwrap();

    for group in wall.groups_mut() {
        group.health_tick();
    }
    for group in wall.groups() {
        for binding in group.slot_bindings() {
            if let Some(state) = binding.state {
                assert_eq!(state, ConnectionState::Live);
            }
        }
    }

    wall.shutdown();
    assert_eq!(backend.live_handles(), 0);
    wall.shutdown();
    assert_eq!(backend.live_handles(), 0);
}
