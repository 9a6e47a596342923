// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Theme mode
//! - `[popup]` - Values popup requests fall back to
//! - `[manager]` - Visible limit and lifecycle timings
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `TOASTBOX_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use toastbox::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.popup.duration_ms = Some(5000);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use crate::popup::{Kind, PopupDefaults, Position, Settings, Width};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Application theme mode (light, dark, or system).
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

/// Values popup requests fall back to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopupSection {
    /// Default kind. Unknown names fall back to `info`.
    #[serde(
        default = "default_kind",
        deserialize_with = "deserialize_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<Kind>,

    /// Auto-dismiss delay in milliseconds, `0` keeps popups until closed.
    #[serde(default = "default_duration_ms", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Whether popups carry a close control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_close: Option<bool>,

    /// `auto` or a CSS length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,

    /// `top` or `bottom`. Unknown names fall back to `top`.
    #[serde(
        default,
        deserialize_with = "deserialize_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<Position>,
}

impl Default for PopupSection {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            duration_ms: default_duration_ms(),
            show_close: Some(false),
            width: Some(Width::Auto),
            position: Some(Position::Top),
        }
    }
}

/// Popup manager tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagerSection {
    /// Active popups allowed before new ones are queued.
    #[serde(default = "default_max_visible", skip_serializing_if = "Option::is_none")]
    pub max_visible: Option<usize>,

    /// Delay before show callbacks run, in milliseconds.
    #[serde(
        default = "default_show_callback_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub show_callback_delay_ms: Option<u64>,

    /// Exit transition length, in milliseconds.
    #[serde(
        default = "default_teardown_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub teardown_delay_ms: Option<u64>,
}

impl Default for ManagerSection {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
            show_callback_delay_ms: default_show_callback_delay_ms(),
            teardown_delay_ms: default_teardown_delay_ms(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub popup: PopupSection,

    #[serde(default)]
    pub manager: ManagerSection,
}

impl Config {
    /// Popup defaults described by the `[popup]` section.
    ///
    /// Durations above [`MAX_DURATION_MS`] are clamped.
    #[must_use]
    pub fn popup_defaults(&self) -> PopupDefaults {
        let base = PopupDefaults::default();
        let section = &self.popup;
        PopupDefaults {
            kind: section.kind.unwrap_or(base.kind),
            duration: section
                .duration_ms
                .map_or(base.duration, |ms| Duration::from_millis(ms.min(MAX_DURATION_MS))),
            show_close: section.show_close.unwrap_or(base.show_close),
            width: section.width.clone().unwrap_or(base.width),
            position: section.position.unwrap_or(base.position),
            content: base.content,
        }
    }

    /// Manager settings described by the `[manager]` section, clamped to
    /// supported ranges.
    #[must_use]
    pub fn manager_settings(&self) -> Settings {
        let section = &self.manager;
        let max_visible = section
            .max_visible
            .unwrap_or(DEFAULT_MAX_VISIBLE)
            .clamp(MIN_MAX_VISIBLE, MAX_MAX_VISIBLE);
        let show_callback_delay_ms = section
            .show_callback_delay_ms
            .unwrap_or(SHOW_CALLBACK_DELAY_MS)
            .min(MAX_SHOW_CALLBACK_DELAY_MS);
        let teardown_delay_ms = section
            .teardown_delay_ms
            .unwrap_or(TEARDOWN_DELAY_MS)
            .min(MAX_TEARDOWN_DELAY_MS);

        Settings {
            max_visible,
            show_callback_delay: Duration::from_millis(show_callback_delay_ms),
            teardown_delay: Duration::from_millis(teardown_delay_ms),
        }
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_kind() -> Option<Kind> {
    Some(Kind::Info)
}

fn default_duration_ms() -> Option<u64> {
    Some(DEFAULT_DURATION_MS)
}

fn default_max_visible() -> Option<usize> {
    Some(DEFAULT_MAX_VISIBLE)
}

fn default_show_callback_delay_ms() -> Option<u64> {
    Some(SHOW_CALLBACK_DELAY_MS)
}

fn default_teardown_delay_ms() -> Option<u64> {
    Some(TEARDOWN_DELAY_MS)
}

fn deserialize_kind<'de, D>(deserializer: D) -> std::result::Result<Option<Kind>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|raw| Kind::parse(&raw)))
}

fn deserialize_position<'de, D>(deserializer: D) -> std::result::Result<Option<Position>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|raw| Position::parse(&raw)))
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    warn!(path = %path.display(), %err, "falling back to default settings");
                    return (
                        Config::default(),
                        Some(format!("Could not load {}: {}", path.display(), err)),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                theme_mode: ThemeMode::Light,
            },
            popup: PopupSection {
                kind: Some(Kind::Warning),
                duration_ms: Some(0),
                show_close: Some(true),
                width: Some(Width::Length("280px".into())),
                position: Some(Position::Bottom),
            },
            manager: ManagerSection {
                max_visible: Some(3),
                show_callback_delay_ms: Some(20),
                teardown_delay_ms: Some(250),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_returns_warning_on_invalid_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[popup\nkind = ")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn load_with_override_missing_file_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: Config = toml::from_str("[popup]\nshow_close = true\n").expect("valid toml");

        assert_eq!(config.popup.show_close, Some(true));
        assert_eq!(config.popup.duration_ms, Some(DEFAULT_DURATION_MS));
        assert_eq!(config.manager, ManagerSection::default());
    }

    #[test]
    fn unknown_kind_and_position_are_normalized() {
        let config: Config =
            toml::from_str("[popup]\nkind = 'shout'\nposition = 'middle'\n").expect("valid toml");

        assert_eq!(config.popup.kind, Some(Kind::Info));
        assert_eq!(config.popup.position, Some(Position::Top));
    }

    #[test]
    fn manager_settings_are_clamped() {
        let config = Config {
            manager: ManagerSection {
                max_visible: Some(0),
                show_callback_delay_ms: Some(u64::MAX),
                teardown_delay_ms: Some(u64::MAX),
            },
            ..Config::default()
        };
        let settings = config.manager_settings();

        assert_eq!(settings.max_visible, MIN_MAX_VISIBLE);
        assert_eq!(
            settings.show_callback_delay,
            Duration::from_millis(MAX_SHOW_CALLBACK_DELAY_MS)
        );
        assert_eq!(
            settings.teardown_delay,
            Duration::from_millis(MAX_TEARDOWN_DELAY_MS)
        );
    }

    #[test]
    fn default_config_matches_manager_defaults() {
        let config = Config::default();
        assert_eq!(config.manager_settings(), Settings::default());
        assert_eq!(config.popup_defaults(), PopupDefaults::default());
    }

    #[test]
    fn popup_defaults_follow_section() {
        let config = Config {
            popup: PopupSection {
                kind: Some(Kind::Error),
                duration_ms: Some(u64::MAX),
                show_close: Some(true),
                width: None,
                position: Some(Position::Bottom),
            },
            ..Config::default()
        };
        let defaults = config.popup_defaults();

        assert_eq!(defaults.kind, Kind::Error);
        assert_eq!(defaults.duration, Duration::from_millis(MAX_DURATION_MS));
        assert!(defaults.show_close);
        assert_eq!(defaults.width, Width::Auto);
        assert_eq!(defaults.position, Position::Bottom);
    }
}
