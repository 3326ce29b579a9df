//! Sync settings and logging setup.
//!
//! Settings are plain JSON (serde) so the host integration can ship them next
//! to its own preferences. Missing keys fall back to defaults.

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::entities::transform::DEFAULT_TOLERANCE;

/// Tunables for snapshot comparison and wrapper creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Tolerance for transform equality (translation, rotation, scale).
    pub transform_tolerance: f64,
    /// Tolerance for brush bounds (origin and extent).
    pub bounds_tolerance: f64,
    /// Hash brush polygons when caching brush info.
    pub hash_brush_surfaces: bool,
    /// Create wrappers for scene components that match no specialised kind.
    pub wrap_generic_scene_components: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            transform_tolerance: DEFAULT_TOLERANCE,
            bounds_tolerance: DEFAULT_TOLERANCE,
            hash_brush_surfaces: true,
            wrap_generic_scene_components: true,
        }
    }
}

impl SyncSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings {}", path.display()))?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{:#}, using default sync settings", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write settings {}", path.display()))?;
        Ok(())
    }
}

/// Initialise `env_logger` with a default filter (`RUST_LOG` wins).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(default_level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_defaults() {
        let s = SyncSettings::default();
        assert_eq!(s.transform_tolerance, DEFAULT_TOLERANCE);
        assert!(s.hash_brush_surfaces);
        assert!(s.wrap_generic_scene_components);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: SyncSettings = serde_json::from_str(r#"{ "hash_brush_surfaces": false }"#).unwrap();
        assert!(!s.hash_brush_surfaces);
        assert_eq!(s.bounds_tolerance, DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join(format!("houdini_inputs_{}.json", Uuid::new_v4()));
        let mut s = SyncSettings::default();
        s.transform_tolerance = 0.5;
        s.save(&path).unwrap();
        let loaded = SyncSettings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_missing_file_falls_back() {
        init_logging("warn");
        let path = std::env::temp_dir().join(format!("missing_{}.json", Uuid::new_v4()));
        assert!(SyncSettings::load(&path).is_err());
        assert_eq!(SyncSettings::load_or_default(&path), SyncSettings::default());
    }
}
