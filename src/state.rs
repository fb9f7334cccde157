//! Application configuration
//!
//! Environment-driven settings for the headless wall binary

use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera list JSON file
    pub camera_list: PathBuf,
    /// Location directory JSON file
    pub location_map: PathBuf,
    /// Initial surface width
    pub surface_width: u32,
    /// Initial surface height
    pub surface_height: u32,
    /// Width reserved by the area count side panel when visible
    pub side_panel_width: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_list: std::env::var("CAMERA_LIST")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/etc/camwall/cameras.json")),
            location_map: std::env::var("LOCATION_MAP")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/etc/camwall/locations.json")),
            surface_width: std::env::var("SURFACE_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1920),
            surface_height: std::env::var("SURFACE_HEIGHT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1080),
            side_panel_width: std::env::var("SIDE_PANEL_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(320),
        }
    }
}
