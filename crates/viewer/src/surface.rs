//! Document-mount target
//!
//! [`ViewerSurface`] is everything the controller needs from the page that
//! hosts it: the chrome it updates, the place rendered pages and thumbnails
//! go, and the fullscreen API.

use serde::{Deserialize, Serialize};

use flipview_common::{Result, ZoomLevel};

use crate::dom::Element;

/// Navigation controls whose enabled state tracks the deck boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavControl {
    First,
    Previous,
    Next,
    Last,
}

impl NavControl {
    pub const ALL: [NavControl; 4] = [
        NavControl::First,
        NavControl::Previous,
        NavControl::Next,
        NavControl::Last,
    ];
}

/// One entry of the thumbnail panel
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub ordinal: u32,
    pub element: Element,
}

impl Thumbnail {
    pub fn is_active(&self) -> bool {
        self.element.has_class("active")
    }
}

/// The host page as seen by the viewer controller.
pub trait ViewerSurface {
    /// `data-image` of each slide element already present in the host page,
    /// in document order.
    fn host_slides(&self) -> Vec<Option<String>>;

    /// Show the page total and bound the page slider.
    fn set_total_pages(&mut self, total: u32);

    fn has_stylesheet(&self, id: &str) -> bool;

    fn inject_stylesheet(&mut self, id: &str, css: &str);

    /// Replace the contents of the placeholder for `ordinal`.
    fn render_page(&mut self, ordinal: u32, content: &Element);

    fn set_page_turning(&mut self, ordinal: u32, turning: bool);

    fn set_page_counter(&mut self, text: &str);

    fn set_slider_value(&mut self, ordinal: u32);

    fn set_control_enabled(&mut self, control: NavControl, enabled: bool);

    fn mount_thumbnails(&mut self, thumbnails: &[Thumbnail]);

    fn set_thumbnail_active(&mut self, ordinal: u32, active: bool);

    /// Swap the zoom class on the viewer wrapper.
    fn set_zoom(&mut self, level: ZoomLevel, class: Option<&str>);

    fn set_thumbnail_panel_open(&mut self, open: bool);

    fn is_fullscreen(&self) -> bool;

    fn request_fullscreen(&mut self) -> Result<()>;

    fn exit_fullscreen(&mut self) -> Result<()>;

    fn set_fullscreen_class(&mut self, on: bool);
}
