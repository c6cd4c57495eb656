//! Settings structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level visualization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub input: InputConfig,
    pub debug: DebugConfig,
}

/// The window section of `config.ron`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Logical width at startup.
    pub width: u32,
    /// Logical height at startup.
    pub height: u32,
    /// Open borderless fullscreen instead of a window.
    pub fullscreen: bool,
    /// Present with vsync (Fifo) rather than uncapped.
    pub vsync: bool,
    /// Title bar text.
    pub title: String,
}

/// The render section of `config.ron`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable the bloom post chain. When off, the scene is tonemapped
    /// straight to the surface.
    pub bloom: bool,
    /// Bloom strength multiplier.
    pub bloom_intensity: f32,
    /// Luminance threshold for bloom extraction.
    pub bloom_threshold: f32,
}

/// The input section of `config.ron`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Drag distance in logical pixels before a touch counts as a swipe.
    pub touch_threshold_px: f64,
}

/// The debug section of `config.ron`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Tracing filter directive, e.g. "info" or "debug,wgpu=warn".
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Lumina".into(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            bloom: true,
            bloom_intensity: 2.0,
            bloom_threshold: 0.2,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            touch_threshold_px: 12.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        DebugConfig {
            log_level: "info".into(),
        }
    }
}

/// Default per-user config directory, platform dependent.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("lumina"))
}

impl Config {
    /// Load `config.ron` from the given directory. A missing file is
    /// written with defaults so the user has something to edit.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let defaults = Config::default();
            defaults.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            return Ok(defaults);
        }

        let text = std::fs::read_to_string(&path).map_err(ConfigError::Read)?;
        let loaded = ron::from_str(&text).map_err(ConfigError::Parse)?;
        log::info!("Loaded config from {}", path.display());
        Ok(loaded)
    }

    /// Write this config to `config.ron` in the given directory,
    /// creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;
        let text = ron::ser::to_string_pretty(self, pretty_style())
            .map_err(ConfigError::Serialize)?;
        std::fs::write(config_dir.join(CONFIG_FILE), text).map_err(ConfigError::Write)
    }
}

fn pretty_style() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .separate_tuple_members(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_serialize_readably() {
        let text = ron::ser::to_string_pretty(&Config::default(), pretty_style()).unwrap();
        assert!(text.contains("width: 1280"));
        assert!(text.contains("height: 720"));
        assert!(text.contains("bloom: true"));
        assert!(text.contains("touch_threshold_px: 12.0"));
    }

    #[test]
    fn test_roundtrip_preserves_every_section() {
        let mut original = Config::default();
        original.window.title = "edited".into();
        original.render.bloom_threshold = 0.5;
        original.debug.log_level = "trace".into();
        let text = ron::to_string(&original).unwrap();
        let parsed: Config = ron::from_str(&text).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_missing_section_falls_back_to_defaults() {
        // No `input` section at all.
        let parsed: Config = ron::from_str("(window: (), render: (), debug: ())").unwrap();
        assert_eq!(parsed.input, InputConfig::default());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let parsed: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_save_then_load_recovers_edits() {
        let dir = tempfile::tempdir().unwrap();
        let mut edited = Config::default();
        edited.window.width = 1600;
        edited.window.height = 900;
        edited.render.bloom = false;
        edited.save(dir.path()).unwrap();

        let reloaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(reloaded, edited);
    }

    #[test]
    fn test_first_run_writes_the_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(loaded, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_hand_edited_comments_are_accepted() {
        let text = "// tweaked by hand\n(\n  // defaults below\n)";
        let parsed: Config = ron::from_str(text).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
