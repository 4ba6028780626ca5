//! Viewer controller
//!
//! A [`Viewer`] owns the viewer state and one placeholder per slide. Startup
//! runs strictly in order:
//!
//! ```text
//! manifest ──► markup source ──► stylesheet ──► widget mount
//!    │ (fails: host slides)  │ (fails: none)        │
//!    ▼                       ▼                      ▼
//! descriptors            fragments          populate 1, 2 ─► resize ─► chrome ─► thumbnails
//! ```
//!
//! After startup everything is driven by [`Viewer::handle`] and by the
//! widget's [`FlipEvents`] notifications. Every degraded resource is logged
//! and replaced by fallback content; nothing here returns an error.

use tracing::{debug, error, info, warn};

use flipview_common::{slide_element_id, Manifest, SlideDescriptor, ViewerConfig, ZoomLevel};

use crate::dom::Element;
use crate::fetch::AssetFetcher;
use crate::input::{parse_slider, Button, EventOutcome, Key, UiEvent};
use crate::markup::MarkupSource;
use crate::state::ViewerState;
use crate::surface::{NavControl, ViewerSurface};
use crate::thumbnails::build_thumbnails;
use crate::transform::{missing_content, page_clone};
use crate::widget::{FlipEvents, FlipWidget, PageContainer, TurnDecision};

/// Placeholder for one page: empty until first populated, never emptied.
#[derive(Debug, Clone)]
pub struct PagePlaceholder {
    container: PageContainer,
    content: Option<Element>,
}

impl PagePlaceholder {
    pub fn ordinal(&self) -> u32 {
        self.container.ordinal
    }

    pub fn container(&self) -> &PageContainer {
        &self.container
    }

    pub fn content(&self) -> Option<&Element> {
        self.content.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.content.is_some()
    }
}

/// Page-flip viewer over an injected surface and page-turn widget
pub struct Viewer<S: ViewerSurface, W: FlipWidget> {
    widget: W,
    core: ViewerCore<S>,
}

/// Everything but the widget, so the widget can call back into it while a
/// command runs.
struct ViewerCore<S: ViewerSurface> {
    config: ViewerConfig,
    surface: S,
    state: ViewerState,
    slides: Vec<SlideDescriptor>,
    markup: Option<MarkupSource>,
    pages: Vec<PagePlaceholder>,
}

impl<S: ViewerSurface, W: FlipWidget> Viewer<S, W> {
    /// Load the deck through `fetcher` and bring the viewer up on `surface`.
    pub async fn start<F>(config: ViewerConfig, fetcher: &F, mut surface: S, widget: W) -> Self
    where
        F: AssetFetcher + ?Sized,
    {
        let slides = load_slides(&config, fetcher, &surface).await;
        surface.set_total_pages(slides.len() as u32);

        let markup = load_markup(&config, fetcher).await;
        load_stylesheet(&config, fetcher, &mut surface).await;

        Self::from_parts(config, surface, widget, slides, markup)
    }

    /// Bring the viewer up from already loaded slides and markup.
    pub fn from_parts(
        config: ViewerConfig,
        surface: S,
        widget: W,
        slides: Vec<SlideDescriptor>,
        markup: Option<MarkupSource>,
    ) -> Self {
        let total = slides.len() as u32;
        let pages = PageContainer::for_deck(total)
            .into_iter()
            .map(|container| PagePlaceholder {
                container,
                content: None,
            })
            .collect();

        let mut viewer = Self {
            widget,
            core: ViewerCore {
                config,
                surface,
                state: ViewerState::new(total),
                slides,
                markup,
                pages,
            },
        };
        viewer.mount();
        viewer
    }

    fn mount(&mut self) {
        let total = self.core.state.total;
        let containers = self
            .core
            .pages
            .iter()
            .map(|page| page.container.clone())
            .collect();
        if let Err(e) = self.widget.mount(containers, &self.core.config.widget) {
            error!("Page-turn widget failed to mount: {}", e);
        }

        self.core.populate(1);
        if total > 1 {
            self.core.populate(2);
        }

        let (width, height) = (self.core.config.widget.width, self.core.config.widget.height);
        self.widget.resize(width, height);

        self.core.sync_chrome();

        let thumbnails = build_thumbnails(
            &self.core.slides,
            self.core.markup.as_ref(),
            &self.core.config.thumbnails,
        );
        self.core.surface.mount_thumbnails(&thumbnails);

        info!("Viewer ready with {} pages", total);
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.core.config
    }

    pub fn state(&self) -> &ViewerState {
        &self.core.state
    }

    pub fn slides(&self) -> &[SlideDescriptor] {
        &self.core.slides
    }

    pub fn markup(&self) -> Option<&MarkupSource> {
        self.core.markup.as_ref()
    }

    pub fn pages(&self) -> &[PagePlaceholder] {
        &self.core.pages
    }

    pub fn page(&self, ordinal: u32) -> Option<&PagePlaceholder> {
        self.core.placeholder_index(ordinal).map(|i| &self.core.pages[i])
    }

    pub fn surface(&self) -> &S {
        &self.core.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.core.surface
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Fill the placeholder for `ordinal` unless it is unknown or already
    /// filled. Returns whether anything was rendered.
    pub fn populate(&mut self, ordinal: u32) -> bool {
        self.core.populate(ordinal)
    }

    pub fn previous(&mut self) {
        self.widget.previous(&mut self.core);
    }

    pub fn next(&mut self) {
        self.widget.next(&mut self.core);
    }

    /// Turn to `ordinal`; ignored outside `1..=total`.
    pub fn go_to(&mut self, ordinal: u32) {
        if !self.core.state.contains(ordinal) {
            debug!(
                "Ignoring go-to {} outside 1..={}",
                ordinal, self.core.state.total
            );
            return;
        }
        self.widget.turn_to(ordinal, &mut self.core);
    }

    pub fn first(&mut self) {
        self.go_to(1);
    }

    pub fn last(&mut self) {
        self.go_to(self.core.state.total);
    }

    pub fn zoom_in(&mut self) {
        self.core.set_zoom(ZoomLevel::In);
    }

    pub fn zoom_out(&mut self) {
        self.core.set_zoom(ZoomLevel::Out);
    }

    pub fn toggle_fullscreen(&mut self) {
        let core = &mut self.core;
        if core.surface.is_fullscreen() {
            if let Err(e) = core.surface.exit_fullscreen() {
                warn!("Leaving fullscreen failed: {}", e);
            }
            core.state.fullscreen = false;
            core.surface.set_fullscreen_class(false);
            return;
        }

        match core.surface.request_fullscreen() {
            Ok(()) => {
                core.state.fullscreen = true;
                core.surface.set_fullscreen_class(true);
            }
            Err(e) => {
                error!("Entering fullscreen failed: {}", e);
                core.state.fullscreen = false;
            }
        }
    }

    pub fn toggle_thumbnails(&mut self) {
        let open = !self.core.state.thumbnails_open;
        self.core.set_thumbnails_open(open);
    }

    pub fn close_thumbnails(&mut self) {
        self.core.set_thumbnails_open(false);
    }

    /// Dispatch a UI event from the host page.
    pub fn handle(&mut self, event: UiEvent) -> EventOutcome {
        match event {
            UiEvent::Click(button) => self.click(button),
            UiEvent::SliderInput(raw) => match parse_slider(&raw) {
                Some(ordinal) => self.go_to(ordinal),
                None => debug!("Ignoring slider value {:?}", raw),
            },
            UiEvent::ThumbnailClick(ordinal) => {
                self.go_to(ordinal);
                self.close_thumbnails();
            }
            UiEvent::KeyDown(key) => return self.key_down(&key),
        }
        EventOutcome::handled()
    }

    fn click(&mut self, button: Button) {
        match button {
            Button::First => self.first(),
            Button::Previous => self.previous(),
            Button::Next => self.next(),
            Button::Last => self.last(),
            Button::ZoomIn => self.zoom_in(),
            Button::ZoomOut => self.zoom_out(),
            Button::Fullscreen => self.toggle_fullscreen(),
            Button::ToggleThumbnails => self.toggle_thumbnails(),
            Button::CloseThumbnails => self.close_thumbnails(),
        }
    }

    fn key_down(&mut self, key: &Key) -> EventOutcome {
        if key.name() == self.core.config.fullscreen_key {
            self.toggle_fullscreen();
            return EventOutcome::prevent_default();
        }
        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Home => self.first(),
            Key::End => self.last(),
            Key::Escape => {
                if self.core.surface.is_fullscreen() {
                    self.toggle_fullscreen();
                }
                self.close_thumbnails();
            }
            Key::Other(_) => {}
        }
        EventOutcome::handled()
    }
}

impl<S: ViewerSurface> ViewerCore<S> {
    fn placeholder_index(&self, ordinal: u32) -> Option<usize> {
        let index = (ordinal as usize).checked_sub(1)?;
        (index < self.pages.len()).then_some(index)
    }

    fn populate(&mut self, ordinal: u32) -> bool {
        let Some(index) = self.placeholder_index(ordinal) else {
            return false;
        };
        if self.pages[index].is_populated() {
            return false;
        }

        let content = match &self.markup {
            Some(markup) => match markup.fragment(ordinal) {
                Some(fragment) => {
                    debug!("Cloning slide {} into its page", ordinal);
                    page_clone(fragment)
                }
                None => {
                    warn!(
                        "Slide element {} not found in {}",
                        slide_element_id(&self.config.slide_id_prefix, ordinal),
                        self.config.markup
                    );
                    missing_content(ordinal)
                }
            },
            None => {
                warn!(
                    "{} not loaded, page {} gets placeholder content",
                    self.config.markup, ordinal
                );
                missing_content(ordinal)
            }
        };

        self.surface.render_page(ordinal, &content);
        self.pages[index].content = Some(content);
        true
    }

    fn page_changed(&mut self, page: u32) {
        self.state.current = page;
        self.sync_chrome();
        for ordinal in self.state.window() {
            self.populate(ordinal);
        }
    }

    /// Counter, slider, boundary controls and thumbnail highlight.
    fn sync_chrome(&mut self) {
        let text = self.state.counter_text();
        self.surface.set_page_counter(&text);
        self.surface.set_slider_value(self.state.current);

        let at_first = self.state.at_first();
        let at_last = self.state.at_last();
        for control in NavControl::ALL {
            let enabled = match control {
                NavControl::First | NavControl::Previous => !at_first,
                NavControl::Next | NavControl::Last => !at_last,
            };
            self.surface.set_control_enabled(control, enabled);
        }

        for slide in &self.slides {
            self.surface
                .set_thumbnail_active(slide.ordinal, slide.ordinal == self.state.current);
        }
    }

    fn set_zoom(&mut self, level: ZoomLevel) {
        self.state.zoom = level;
        let class = self.config.zoom.class(level);
        self.surface.set_zoom(level, class);
        debug!("Zoom {} ({})", level, self.config.zoom.factor(level));
    }

    fn set_thumbnails_open(&mut self, open: bool) {
        self.state.thumbnails_open = open;
        self.surface.set_thumbnail_panel_open(open);
    }
}

impl<S: ViewerSurface> FlipEvents for ViewerCore<S> {
    fn turning(&mut self, page: u32, _view: &[u32]) -> TurnDecision {
        if self.state.contains(page) {
            TurnDecision::Proceed
        } else {
            debug!("Vetoing turn to page {} of {}", page, self.state.total);
            TurnDecision::Prevent
        }
    }

    fn turned(&mut self, page: u32, _view: &[u32]) {
        self.page_changed(page);
    }

    fn missing(&mut self, pages: &[u32]) {
        for &page in pages {
            self.populate(page);
        }
    }

    fn start(&mut self, page: u32) {
        self.surface.set_page_turning(page, true);
    }

    fn end(&mut self, page: u32, _turned: bool) {
        self.surface.set_page_turning(page, false);
    }
}

async fn load_slides<F, S>(config: &ViewerConfig, fetcher: &F, surface: &S) -> Vec<SlideDescriptor>
where
    F: AssetFetcher + ?Sized,
    S: ViewerSurface,
{
    let manifest = fetcher
        .fetch_text(&config.manifest)
        .await
        .and_then(|text| Manifest::from_json(&text));

    match manifest {
        Ok(manifest) => {
            let slides = manifest.descriptors();
            if let Some(total) = manifest.total_slides {
                if total as usize != slides.len() {
                    warn!(
                        "{} reports {} slides but lists {}",
                        config.manifest,
                        total,
                        slides.len()
                    );
                }
            }
            info!("Loaded {} slides from {}", slides.len(), config.manifest);
            slides
        }
        Err(e) => {
            error!("Failed to load {}: {}", config.manifest, e);
            let slides = SlideDescriptor::from_host_slides(surface.host_slides());
            warn!("Derived {} slides from the host page", slides.len());
            slides
        }
    }
}

async fn load_markup<F>(config: &ViewerConfig, fetcher: &F) -> Option<MarkupSource>
where
    F: AssetFetcher + ?Sized,
{
    let source = fetcher
        .fetch_text(&config.markup)
        .await
        .and_then(|text| MarkupSource::parse(&text, &config.slide_id_prefix));

    match source {
        Ok(source) => {
            info!(
                "Loaded {} ({} slide elements, {} addressable)",
                config.markup,
                source.census(),
                source.len()
            );
            Some(source)
        }
        Err(e) => {
            error!("Failed to load {}: {}", config.markup, e);
            None
        }
    }
}

async fn load_stylesheet<F, S>(config: &ViewerConfig, fetcher: &F, surface: &mut S)
where
    F: AssetFetcher + ?Sized,
    S: ViewerSurface,
{
    if surface.has_stylesheet(&config.stylesheet_id) {
        debug!("Stylesheet {} already injected", config.stylesheet_id);
        return;
    }

    match fetcher.fetch_text(&config.stylesheet).await {
        Ok(css) => {
            surface.inject_stylesheet(&config.stylesheet_id, &css);
            info!("Injected {} ({} bytes)", config.stylesheet, css.len());
        }
        Err(e) => warn!("Failed to load {}: {}", config.stylesheet, e),
    }
}
