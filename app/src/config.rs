use companymap_types::ViewerConfig;

/// Viewer settings compiled into the bundle.
const EMBEDDED_CONFIG: &str = include_str!("../viewer.toml");

/// Parse the embedded `viewer.toml`, falling back to defaults if it is invalid.
pub fn load_config() -> ViewerConfig {
    match toml::from_str(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid embedded viewer.toml, using defaults");
            ViewerConfig::default()
        }
    }
}
