//! Configuration file support for pdfmark.
//!
//! Preferences and per-tool defaults are stored as JSON: in the user's config
//! directory on native builds and in localStorage in the browser.

use serde::{Deserialize, Serialize};

use crate::color_utils::Color;
use crate::constants::{style, text, view};
use crate::model::{DraftStyle, ShapeKind};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    #[serde(default)]
    pub preferences: Preferences,

    /// Starting style for each annotation tool
    #[serde(default)]
    pub tool_defaults: ToolDefaults,
}

/// Viewer preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Log verbosity level
    pub log_level: LogLevel,
    /// Zoom multiplier per zoom in/out step
    pub zoom_step: f32,
    /// Padding in pixels left around the page by fit width / fit page
    pub fit_padding: f32,
    /// Scale of the thumbnail strip
    pub thumbnail_scale: f32,
    /// Initially selected annotation color
    pub default_color: Color,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            zoom_step: view::ZOOM_STEP,
            fit_padding: view::FIT_PADDING,
            thumbnail_scale: view::THUMBNAIL_SCALE,
            default_color: Color::RED,
        }
    }
}

/// Per-tool defaults section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    pub font_size: u32,
    pub font_family: String,
    /// Opacity in `[0, 1]`
    pub highlight_opacity: f32,
    pub draw_line_width: u8,
    pub shape_kind: ShapeKind,
    pub shape_line_width: u8,
    pub shape_fill: bool,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            font_size: text::DEFAULT_FONT_SIZE,
            font_family: text::DEFAULT_FONT_FAMILY.to_string(),
            highlight_opacity: style::DEFAULT_HIGHLIGHT_OPACITY,
            draw_line_width: style::DEFAULT_LINE_WIDTH,
            shape_kind: ShapeKind::default(),
            shape_line_width: style::DEFAULT_LINE_WIDTH,
            shape_fill: false,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: Preferences::default(),
            tool_defaults: ToolDefaults::default(),
        }
    }

    /// Style new drafts start with.
    ///
    /// Values the properties panel couldn't offer fall back to the built-in
    /// defaults; numeric values are clamped to the panel's ranges.
    pub fn draft_style(&self) -> DraftStyle {
        let t = &self.tool_defaults;
        let builtin = DraftStyle::default();
        let opacity_min = f32::from(style::OPACITY_PERCENT_MIN) / 100.0;
        let opacity_max = f32::from(style::OPACITY_PERCENT_MAX) / 100.0;

        DraftStyle {
            color: self.preferences.default_color,
            font_size: if text::FONT_SIZES.contains(&t.font_size) {
                t.font_size
            } else {
                builtin.font_size
            },
            font_family: if text::FONT_FAMILIES.contains(&t.font_family.as_str()) {
                t.font_family.clone()
            } else {
                builtin.font_family
            },
            highlight_opacity: t.highlight_opacity.clamp(opacity_min, opacity_max),
            draw_line_width: t
                .draw_line_width
                .clamp(style::LINE_WIDTH_MIN, style::LINE_WIDTH_MAX),
            shape_kind: t.shape_kind,
            shape_line_width: t
                .shape_line_width
                .clamp(style::LINE_WIDTH_MIN, style::LINE_WIDTH_MAX),
            shape_fill: t.shape_fill,
        }
    }

    /// Remember the panel's current defaults.
    pub fn set_tool_defaults(&mut self, style: &DraftStyle) {
        self.preferences.default_color = style.color;
        self.tool_defaults = ToolDefaults {
            font_size: style.font_size,
            font_family: style.font_family.clone(),
            highlight_opacity: style.highlight_opacity,
            draw_line_width: style.draw_line_width,
            shape_kind: style.shape_kind,
            shape_line_width: style.shape_line_width,
            shape_fill: style.shape_fill,
        };
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "pdfmark-config.json"
    }

    /// Default config file path. `None` if no config or home directory is known.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join("pdfmark").join(Self::default_filename()))
    }

    /// Read a config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write a config file, creating parent directories as needed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from the default path, or `None` if missing or unreadable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "pdfmark-config";

    /// Load from localStorage, or `None` if missing or unreadable.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let window = web_sys::window()
            .ok_or_else(|| ConfigError::StorageError("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| ConfigError::StorageError(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))?;

        let json = self.to_json()?;
        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }

    /// Load from the platform's store, falling back to defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default() -> Self {
        Self::load_from_default_path().unwrap_or_default()
    }

    /// Load from the platform's store, falling back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load_or_default() -> Self {
        Self::load_from_local_storage().unwrap_or_default()
    }

    /// Save to the platform's store.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_default_path()
    }

    /// Save to the platform's store.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_local_storage()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// localStorage failure in the browser
    #[error("Storage error: {0}")]
    StorageError(String),
}
