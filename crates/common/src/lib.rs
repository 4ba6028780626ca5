//! FlipView Common Library
//!
//! Shared types, configuration and error handling for the FlipView viewer,
//! deck server and smoke diagnostics.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{DisplayMode, ThumbnailConfig, ViewerConfig, WidgetOptions, ZoomConfig};
pub use error::{Error, Result};
pub use types::*;

/// FlipView version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default manifest document name
pub const DEFAULT_MANIFEST: &str = "metadata.json";

/// Default markup source document name
pub const DEFAULT_MARKUP: &str = "index.html";

/// Default slide stylesheet name
pub const DEFAULT_STYLESHEET: &str = "style.css";

/// Default viewer page name
pub const DEFAULT_VIEWER_PAGE: &str = "flipbook.html";

/// Prefix of the element id carrying each slide fragment
pub const DEFAULT_SLIDE_ID_PREFIX: &str = "slide";

/// Element id of the injected slide stylesheet
pub const DEFAULT_STYLESHEET_ID: &str = "slide-styles";

/// Element id of the markup fragment for `ordinal`.
pub fn slide_element_id(prefix: &str, ordinal: u32) -> String {
    format!("{}{}", prefix, ordinal)
}
