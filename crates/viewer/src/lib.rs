//! FlipView Viewer
//!
//! Content-backed page virtualization for a page-flip slide viewer. The
//! [`Viewer`] loads a deck (manifest, markup source, stylesheet) through an
//! [`AssetFetcher`], mounts one placeholder per slide in a [`FlipWidget`],
//! and lazily clones slide markup into the pages around the current one as
//! navigation happens on a [`ViewerSurface`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   fetch_text    ┌─────────────────────────────────────┐
//! │ AssetFetcher │◄────────────────│               Viewer                │
//! └──────────────┘                 │  ViewerState   PagePlaceholder × N  │
//! ┌──────────────┐  chrome, pages  │  MarkupSource  SlideDescriptor × N  │
//! │ ViewerSurface│◄────────────────│                                     │
//! └──────────────┘                 └───────┬─────────────────▲───────────┘
//!                                  commands│                 │FlipEvents
//!                                  ┌───────▼─────────────────┴───────────┐
//!                                  │             FlipWidget              │
//!                                  └─────────────────────────────────────┘
//! ```

pub mod controller;
pub mod dom;
pub mod fetch;
pub mod headless;
pub mod input;
pub mod markup;
pub mod state;
pub mod surface;
pub mod thumbnails;
pub mod transform;
pub mod widget;

pub use controller::{PagePlaceholder, Viewer};
pub use dom::{Element, Node};
pub use fetch::{AssetFetcher, DirFetcher, HttpFetcher};
pub use headless::{HeadlessSurface, SurfaceSnapshot};
pub use input::{Button, EventOutcome, Key, UiEvent};
pub use markup::{parse_html, MarkupSource};
pub use state::{counter_text, ViewerState};
pub use surface::{NavControl, Thumbnail, ViewerSurface};
pub use widget::{FlipEvents, FlipWidget, PageContainer, SpreadWidget, TurnDecision};
