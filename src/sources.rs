//! Camera source list and area grouping
//!
//! The camera list is loaded once at startup from a JSON file and partitioned
//! by area before any group is built. An empty list is fatal: a wall with
//! zero groups displays nothing and must not start.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One configured camera stream, immutable after group assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSource {
    pub uri: String,
    pub area: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_key: Option<String>,
}

/// Load the camera list from a JSON file
pub fn load_camera_list(path: &Path) -> Result<Vec<CameraSource>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read camera list {}: {e}", path.display())))?;
    let cameras: Vec<CameraSource> = serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("Invalid camera list {}: {e}", path.display())))?;
    if cameras.is_empty() {
        return Err(Error::Config(format!(
            "Camera list {} is empty - refusing to start a wall with zero groups",
            path.display()
        )));
    }
    tracing::info!(count = cameras.len(), "Camera list loaded");
    Ok(cameras)
}

/// Partition cameras by area, preserving first-occurrence order of each area
/// and insertion order within an area
pub fn group_by_area(cameras: Vec<CameraSource>) -> Vec<(String, Vec<CameraSource>)> {
    let mut groups: Vec<(String, Vec<CameraSource>)> = Vec::new();
    for camera in cameras {
        match groups.iter_mut().find(|(area, _)| *area == camera.area) {
            Some((_, members)) => members.push(camera),
            None => groups.push((camera.area.clone(), vec![camera])),
        }
    }
    groups
}
