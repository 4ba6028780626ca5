//! FlipView Deck Server
//!
//! Serves a deck directory (viewer page, manifest, markup source, slide
//! stylesheet and images) over HTTP, with a health route and a diagnostic
//! deck summary.

pub mod deck;
pub mod server;
pub mod static_files;

pub use server::{DeckServer, WebServerConfig};
pub use static_files::StaticFiles;
