//! Startup configuration: `engine.json` (render target size, tick rate,
//! split-screen layout, debug toggles) and `tiled_prefab_mapping.json` (Tiled
//! object `type` strings to blueprint asset ids, for maps authored against
//! names that don't match a blueprint's own `name` field 1:1).
//!
//! Both are loaded once at startup the way the platform layer loads
//! [`crate::window::WindowConfig`] — `serde_json` structs with a `Default`
//! impl so a missing or partial file degrades to sane behavior rather than
//! aborting startup.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Split-screen tiling requested at startup; `SetupSplitScreen`/
/// `SetupMultiWindow` (see [`crate::render::viewport`]) accept the same
/// shape at runtime, this is just the value loaded from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutConfig {
    SplitScreen { players: u32 },
    MultiWindow { players: u32, width: u32, height: u32 },
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig::SplitScreen { players: 1 }
    }
}

/// Top-level `engine.json` contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Internal render-target resolution (independent of the OS window's
    /// physical size — see [`crate::window::WindowConfig`]).
    pub render_width: u32,
    pub render_height: u32,
    /// Fixed simulation tick rate, in updates per second.
    pub target_ups: u32,
    pub layout: LayoutConfig,
    /// Draw the navigation/collision/tile debug overlay (§4.3.4) by default.
    pub debug_overlay: bool,
    /// Overlay alpha, 0-255; kept high enough to stay legible over world art.
    pub debug_overlay_alpha: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_width: 1280,
            render_height: 720,
            target_ups: 60,
            layout: LayoutConfig::default(),
            debug_overlay: false,
            debug_overlay_alpha: 150,
        }
    }
}

impl EngineConfig {
    /// Loads `path` as JSON, falling back to [`Default::default`] (with a
    /// logged warning) if the file is missing or malformed — startup must
    /// never abort over a missing config file.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("malformed engine config at {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("no engine config at {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> EngineResult<Self> {
        serde_json::from_str(text).map_err(|e| EngineError::MalformedContent {
            path: "engine.json".into(),
            reason: e.to_string(),
        })
    }
}

/// Maps a Tiled object's `type` string to the blueprint asset id that should
/// be instantiated for it, for maps authored against external naming
/// conventions that don't line up with a blueprint's own `name` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefabMapping {
    #[serde(flatten)]
    entries: HashMap<String, String>,
}

impl PrefabMapping {
    pub fn parse(text: &str) -> EngineResult<Self> {
        serde_json::from_str(text).map_err(|e| EngineError::MalformedContent {
            path: "tiled_prefab_mapping.json".into(),
            reason: e.to_string(),
        })
    }

    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::parse(&text) {
                Ok(mapping) => mapping,
                Err(e) => {
                    log::warn!("malformed prefab mapping at {}: {e}, ignoring", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// The blueprint lookup key to use for a Tiled object whose `type` is
    /// `tiled_type` — the mapped id if one is configured, otherwise
    /// `tiled_type` itself unchanged.
    pub fn resolve<'a>(&'a self, tiled_type: &'a str) -> &'a str {
        self.entries.get(tiled_type).map(String::as_str).unwrap_or(tiled_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_defaults_to_one_player_split_screen_at_60_ups() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.target_ups, 60);
        assert_eq!(cfg.layout, LayoutConfig::SplitScreen { players: 1 });
    }

    #[test]
    fn engine_config_parses_a_multi_window_layout() {
        let json = r#"{
            "render_width": 1920, "render_height": 1080, "target_ups": 30,
            "layout": { "kind": "multi_window", "players": 2, "width": 800, "height": 600 },
            "debug_overlay": true, "debug_overlay_alpha": 200
        }"#;
        let cfg = EngineConfig::parse(json).unwrap();
        assert_eq!(cfg.render_width, 1920);
        assert_eq!(cfg.layout, LayoutConfig::MultiWindow { players: 2, width: 800, height: 600 });
        assert!(cfg.debug_overlay);
    }

    #[test]
    fn engine_config_missing_fields_fall_back_to_defaults() {
        let cfg = EngineConfig::parse("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn malformed_engine_config_file_falls_back_without_panicking() {
        let cfg = EngineConfig::parse("not json");
        assert!(cfg.is_err());
    }

    #[test]
    fn prefab_mapping_resolves_mapped_types_and_passes_through_unmapped_ones() {
        let mapping = PrefabMapping::parse(r#"{"guard_t1": "guard_basic", "chest_gold": "loot_chest"}"#).unwrap();
        assert_eq!(mapping.resolve("guard_t1"), "guard_basic");
        assert_eq!(mapping.resolve("torch"), "torch");
    }

    #[test]
    fn prefab_mapping_missing_file_yields_an_empty_passthrough_mapping() {
        let mapping = PrefabMapping::load_or_default(Path::new("/nonexistent/tiled_prefab_mapping.json"));
        assert_eq!(mapping.resolve("anything"), "anything");
    }
}
