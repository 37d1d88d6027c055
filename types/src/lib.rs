//! Shared configuration types for the company map viewer.
//!
//! Everything here is plain serde data so the web app (embedded TOML) and the
//! validation CLI (`--config`) read the same file format. Every field has a
//! default, so a partial or empty file is valid.

use serde::{Deserialize, Serialize};

pub mod formatting;

/// Default tile endpoint (OpenStreetMap standard layer).
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str = "© OpenStreetMap";

// ─────────────────────────────────────────────────────────────────────────────
// Viewer Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub map: MapConfig,
    pub coordinates: CoordinateAliases,
}

/// Base map setup. The app only configures view bounds and attribution; tile
/// fetching is left to the map library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial view centre as `[latitude, longitude]`.
    pub center: [f64; 2],
    pub zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [45.464, 9.19],
            zoom: 6,
            max_zoom: 19,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

/// Candidate column names per axis, checked in order.
///
/// The first key whose value is present and numeric wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateAliases {
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
}

impl Default for CoordinateAliases {
    fn default() -> Self {
        Self {
            latitude: vec!["lat".into(), "Latitudine".into(), "latitude".into()],
            longitude: vec!["lng".into(), "Longitudine".into(), "longitude".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ViewerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.map.zoom, 6);
        assert_eq!(config.map.max_zoom, 19);
        assert_eq!(config.coordinates.latitude, vec!["lat", "Latitudine", "latitude"]);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml = r#"
[map]
zoom = 9

[coordinates]
longitude = ["lon", "x"]
"#;
        let config: ViewerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.map.zoom, 9);
        assert_eq!(config.map.center, [45.464, 9.19]);
        assert_eq!(config.map.tile_url, DEFAULT_TILE_URL);
        assert_eq!(config.coordinates.longitude, vec!["lon", "x"]);
        assert_eq!(config.coordinates.latitude, CoordinateAliases::default().latitude);
    }
}
