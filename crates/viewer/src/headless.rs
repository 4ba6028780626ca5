//! In-memory viewer surface
//!
//! Records every chrome update the controller makes so a deck can be driven
//! without a browser: by the smoke walk and by tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use flipview_common::{Error, Result, ZoomLevel};

use crate::dom::Element;
use crate::surface::{NavControl, Thumbnail, ViewerSurface};

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    host_slides: Vec<Option<String>>,
    deny_fullscreen: bool,

    total_pages: u32,
    stylesheets: Vec<(String, String)>,
    pages: BTreeMap<u32, Element>,
    render_counts: BTreeMap<u32, usize>,
    turning: BTreeSet<u32>,
    counter: String,
    slider: u32,
    disabled: BTreeSet<NavControl>,
    thumbnails: Vec<Thumbnail>,
    zoom: ZoomLevel,
    zoom_class: Option<String>,
    panel_open: bool,
    fullscreen: bool,
    fullscreen_class: bool,
}

/// Serializable snapshot of a headless surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub total_pages: u32,
    pub counter: String,
    pub slider: u32,
    pub populated: Vec<u32>,
    pub active_thumbnails: Vec<u32>,
    pub disabled: Vec<NavControl>,
    pub zoom: ZoomLevel,
    pub thumbnails_open: bool,
    pub fullscreen: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the host page already contains slide elements with these
    /// `data-image` attributes.
    pub fn with_host_slides(mut self, images: Vec<Option<String>>) -> Self {
        self.host_slides = images;
        self
    }

    /// Make every fullscreen request fail.
    pub fn deny_fullscreen(mut self) -> Self {
        self.deny_fullscreen = true;
        self
    }

    /// Simulate the user leaving fullscreen through the browser.
    pub fn leave_fullscreen_externally(&mut self) {
        self.fullscreen = false;
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn stylesheets(&self) -> &[(String, String)] {
        &self.stylesheets
    }

    /// Rendered content of the placeholder for `ordinal`.
    pub fn page(&self, ordinal: u32) -> Option<&Element> {
        self.pages.get(&ordinal)
    }

    pub fn populated_pages(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    /// How often the placeholder for `ordinal` was rendered.
    pub fn render_count(&self, ordinal: u32) -> usize {
        self.render_counts.get(&ordinal).copied().unwrap_or(0)
    }

    pub fn is_turning(&self, ordinal: u32) -> bool {
        self.turning.contains(&ordinal)
    }

    pub fn counter(&self) -> &str {
        &self.counter
    }

    pub fn slider(&self) -> u32 {
        self.slider
    }

    pub fn is_enabled(&self, control: NavControl) -> bool {
        !self.disabled.contains(&control)
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    pub fn active_thumbnails(&self) -> Vec<u32> {
        self.thumbnails
            .iter()
            .filter(|t| t.is_active())
            .map(|t| t.ordinal)
            .collect()
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn zoom_class(&self) -> Option<&str> {
        self.zoom_class.as_deref()
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn fullscreen_class(&self) -> bool {
        self.fullscreen_class
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            total_pages: self.total_pages,
            counter: self.counter.clone(),
            slider: self.slider,
            populated: self.populated_pages(),
            active_thumbnails: self.active_thumbnails(),
            disabled: self.disabled.iter().copied().collect(),
            zoom: self.zoom,
            thumbnails_open: self.panel_open,
            fullscreen: self.fullscreen,
        }
    }
}

impl ViewerSurface for HeadlessSurface {
    fn host_slides(&self) -> Vec<Option<String>> {
        self.host_slides.clone()
    }

    fn set_total_pages(&mut self, total: u32) {
        self.total_pages = total;
    }

    fn has_stylesheet(&self, id: &str) -> bool {
        self.stylesheets.iter().any(|(existing, _)| existing == id)
    }

    fn inject_stylesheet(&mut self, id: &str, css: &str) {
        self.stylesheets.push((id.to_string(), css.to_string()));
    }

    fn render_page(&mut self, ordinal: u32, content: &Element) {
        self.pages.insert(ordinal, content.clone());
        *self.render_counts.entry(ordinal).or_default() += 1;
    }

    fn set_page_turning(&mut self, ordinal: u32, turning: bool) {
        if turning {
            self.turning.insert(ordinal);
        } else {
            self.turning.remove(&ordinal);
        }
    }

    fn set_page_counter(&mut self, text: &str) {
        self.counter = text.to_string();
    }

    fn set_slider_value(&mut self, ordinal: u32) {
        self.slider = ordinal;
    }

    fn set_control_enabled(&mut self, control: NavControl, enabled: bool) {
        if enabled {
            self.disabled.remove(&control);
        } else {
            self.disabled.insert(control);
        }
    }

    fn mount_thumbnails(&mut self, thumbnails: &[Thumbnail]) {
        self.thumbnails.extend_from_slice(thumbnails);
    }

    fn set_thumbnail_active(&mut self, ordinal: u32, active: bool) {
        for thumbnail in self.thumbnails.iter_mut().filter(|t| t.ordinal == ordinal) {
            thumbnail.element.toggle_class("active", active);
        }
    }

    fn set_zoom(&mut self, level: ZoomLevel, class: Option<&str>) {
        self.zoom = level;
        self.zoom_class = class.map(str::to_string);
    }

    fn set_thumbnail_panel_open(&mut self, open: bool) {
        self.panel_open = open;
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) -> Result<()> {
        if self.deny_fullscreen {
            return Err(Error::Fullscreen(
                "permissions check failed".to_string(),
            ));
        }
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<()> {
        self.fullscreen = false;
        Ok(())
    }

    fn set_fullscreen_class(&mut self, on: bool) {
        self.fullscreen_class = on;
    }
}
