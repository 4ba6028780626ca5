//! Viewer configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ZoomLevel;

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Manifest document, relative to the deck root
    pub manifest: String,

    /// Markup source document holding one fragment per slide
    pub markup: String,

    /// Slide stylesheet injected into the host page
    pub stylesheet: String,

    /// Element id given to the injected stylesheet
    pub stylesheet_id: String,

    /// Id prefix of slide fragments; the ordinal is appended
    pub slide_id_prefix: String,

    /// Key that toggles fullscreen
    pub fullscreen_key: String,

    /// Page-turn widget options
    pub widget: WidgetOptions,

    /// Zoom levels
    pub zoom: ZoomConfig,

    /// Thumbnail panel geometry
    pub thumbnails: ThumbnailConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            manifest: crate::DEFAULT_MANIFEST.to_string(),
            markup: crate::DEFAULT_MARKUP.to_string(),
            stylesheet: crate::DEFAULT_STYLESHEET.to_string(),
            stylesheet_id: crate::DEFAULT_STYLESHEET_ID.to_string(),
            slide_id_prefix: crate::DEFAULT_SLIDE_ID_PREFIX.to_string(),
            fullscreen_key: "F11".to_string(),
            widget: WidgetOptions::default(),
            zoom: ZoomConfig::default(),
            thumbnails: ThumbnailConfig::default(),
        }
    }
}

/// Page display mode of the page-turn widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Single,
    Double,
}

/// Configuration bundle handed to the page-turn widget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    pub display: DisplayMode,

    /// Page width; the spread is twice this in double mode
    pub width: u32,

    pub height: u32,

    pub auto_center: bool,

    /// Fold elevation in pixels
    pub elevation: u32,

    pub gradients: bool,

    /// Hardware acceleration
    pub acceleration: bool,

    /// Turn transition length in milliseconds
    pub duration_ms: u32,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            display: DisplayMode::Double,
            width: 1600,
            height: 1200,
            auto_center: true,
            elevation: 150,
            gradients: true,
            acceleration: true,
            duration_ms: 1500,
        }
    }
}

/// The two discrete zoom levels and the wrapper classes that express them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub in_factor: f64,
    pub in_class: String,
    pub out_factor: f64,
    pub out_class: String,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            in_factor: 1.2,
            in_class: "zoomed".to_string(),
            out_factor: 0.7,
            out_class: "zoomed-out".to_string(),
        }
    }
}

impl ZoomConfig {
    /// Scale factor for `level`.
    pub fn factor(&self, level: ZoomLevel) -> f64 {
        match level {
            ZoomLevel::Fit => 1.0,
            ZoomLevel::In => self.in_factor,
            ZoomLevel::Out => self.out_factor,
        }
    }

    /// Wrapper class for `level`, if any.
    pub fn class(&self, level: ZoomLevel) -> Option<&str> {
        match level {
            ZoomLevel::Fit => None,
            ZoomLevel::In => Some(&self.in_class),
            ZoomLevel::Out => Some(&self.out_class),
        }
    }
}

/// Thumbnail panel geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    /// Tile colour for slides without markup
    pub placeholder_color: String,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 225,
            scale: 0.25,
            placeholder_color: "#f0f0f0".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.slide_id_prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "slide_id_prefix must not be empty".to_string(),
            ));
        }
        if self.widget.width == 0 || self.widget.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "widget size {}x{} is empty",
                self.widget.width, self.widget.height
            )));
        }
        if self.thumbnails.scale <= 0.0 {
            return Err(Error::InvalidConfig(
                "thumbnail scale must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
