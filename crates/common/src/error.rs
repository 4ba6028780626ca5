//! Error types for FlipView

use thiserror::Error;

/// Result type alias using FlipView Error
pub type Result<T> = std::result::Result<T, Error>;

/// FlipView error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Fetch of {path} failed: {reason}")]
    Fetch { path: String, reason: String },

    #[error("Fetch of {path} returned HTTP {status}")]
    HttpStatus { path: String, status: u16 },

    #[error("Markup parse error at byte {position}: {reason}")]
    Markup { position: u64, reason: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Fullscreen request rejected: {0}")]
    Fullscreen(String),

    #[error("Widget error: {0}")]
    Widget(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a fetch error for `path` from any displayable cause.
    pub fn fetch(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Fetch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
