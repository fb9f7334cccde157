//! LocationDirectory - Static Location Lookup
//!
//! Maps a stable location key to its display name and area grouping.
//! Loaded once before any group starts, then shared read-only for the
//! process lifetime (`Arc<LocationDirectory>`); lookups never mutate.
//!
//! File format mirrors the deployment mapping:
//! `{ "<locationKey>": { "name": "...", "area": "..." }, ... }`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    #[serde(rename = "name")]
    pub display_name: String,
    pub area: String,
}

/// Read-only locationKey -> entry lookup
#[derive(Debug, Default)]
pub struct LocationDirectory {
    entries: HashMap<String, LocationEntry>,
}

impl LocationDirectory {
    pub fn from_entries(entries: HashMap<String, LocationEntry>) -> Self {
        Self { entries }
    }

    /// Load from a JSON mapping file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read location map {}: {e}", path.display()))
        })?;
        let entries: HashMap<String, LocationEntry> = serde_json::from_str(&raw)
            .map_err(|e| Error::Parse(format!("Invalid location map {}: {e}", path.display())))?;
        tracing::info!(count = entries.len(), "Location directory loaded");
        Ok(Self { entries })
    }

    pub fn get(&self, location_key: &str) -> Option<&LocationEntry> {
        self.entries.get(location_key)
    }

    pub fn area_of(&self, location_key: &str) -> Option<&str> {
        self.entries.get(location_key).map(|e| e.area.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mapping_json() {
        let json = r#"{
            "68c7d0345ae9e9e13020dbb8": { "name": "Security control", "area": "KSAN AREA" },
            "690583e4d2739e469f4efba4": { "name": "Cell block 01", "area": "CELL AREA" }
        }"#;
        let entries: HashMap<String, LocationEntry> = serde_json::from_str(json).unwrap();
        let directory = LocationDirectory::from_entries(entries);

        assert_eq!(directory.len(), 2);
        assert_eq!(
            directory.area_of("68c7d0345ae9e9e13020dbb8"),
            Some("KSAN AREA")
        );
        assert_eq!(
            directory
                .get("690583e4d2739e469f4efba4")
                .map(|e| e.display_name.as_str()),
            Some("Cell block 01")
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let directory = LocationDirectory::default();
        assert!(directory.get("missing").is_none());
        assert!(directory.area_of("missing").is_none());
    }
}
