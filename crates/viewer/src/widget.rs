//! Page-turn widget capability
//!
//! The controller never talks to a concrete page-turn library. It hands the
//! widget one [`PageContainer`] per slide plus the configured
//! [`WidgetOptions`], issues turn commands, and receives lifecycle
//! notifications through [`FlipEvents`] while a command runs.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use flipview_common::{DisplayMode, Result, WidgetOptions};

use crate::dom::Element;

/// Outcome of the page-turning notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDecision {
    Proceed,
    Prevent,
}

/// Lifecycle notifications a widget delivers while executing a command.
pub trait FlipEvents {
    /// A turn towards `page` is about to happen and may be vetoed.
    fn turning(&mut self, page: u32, view: &[u32]) -> TurnDecision;

    /// The widget now shows `page`; `view` lists every page of the spread.
    fn turned(&mut self, page: u32, view: &[u32]);

    /// Pages about to become visible that have not been shown before.
    fn missing(&mut self, pages: &[u32]);

    /// The fold animation revealing `page` started.
    fn start(&mut self, page: u32);

    /// The fold animation revealing `page` ended.
    fn end(&mut self, page: u32, turned: bool);
}

/// Commands the controller issues to a page-turn widget.
pub trait FlipWidget {
    fn mount(&mut self, pages: Vec<PageContainer>, options: &WidgetOptions) -> Result<()>;

    fn next(&mut self, events: &mut dyn FlipEvents);

    fn previous(&mut self, events: &mut dyn FlipEvents);

    fn turn_to(&mut self, page: u32, events: &mut dyn FlipEvents);

    /// Re-apply the page size.
    fn resize(&mut self, width: u32, height: u32);

    /// Page currently shown, 0 before mounting.
    fn page(&self) -> u32;
}

/// Container handed to the widget for one slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContainer {
    pub ordinal: u32,
    pub cover: bool,
    pub back_cover: bool,
}

impl PageContainer {
    /// Containers for a deck of `total` pages; the first is the cover, the
    /// last the back cover.
    pub fn for_deck(total: u32) -> Vec<Self> {
        (1..=total)
            .map(|ordinal| Self {
                ordinal,
                cover: ordinal == 1,
                back_cover: ordinal == total,
            })
            .collect()
    }

    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["page"];
        if self.cover {
            classes.push("cover");
        }
        if self.back_cover {
            classes.push("back-cover");
        }
        classes
    }

    /// The empty container element, styled so the widget receives pointer input.
    pub fn element(&self) -> Element {
        Element::new("div")
            .with_attr("class", self.classes().join(" "))
            .with_attr("data-page", self.ordinal.to_string())
            .with_style("cursor", "pointer")
            .with_style("user-select", "none")
    }
}

/// Pages visible together when `page` is shown.
///
/// In double display the first page stands alone as the cover and later
/// spreads pair an even page with the following odd page.
pub fn spread_view(display: DisplayMode, page: u32, total: u32) -> Vec<u32> {
    if page == 0 || page > total {
        return Vec::new();
    }
    match display {
        DisplayMode::Single => vec![page],
        DisplayMode::Double if page == 1 => vec![1],
        DisplayMode::Double => {
            let left = page - page % 2;
            (left..=left + 1).filter(|p| *p <= total).collect()
        }
    }
}

/// In-process page-turn engine.
///
/// Keeps the same page arithmetic as a browser page-turn widget in single or
/// double display and fires the full notification sequence for every turn,
/// without any animation. Used by the headless walk and by tests.
#[derive(Debug, Default)]
pub struct SpreadWidget {
    pages: Vec<PageContainer>,
    options: Option<WidgetOptions>,
    current: u32,
    size: (u32, u32),
    shown: BTreeSet<u32>,
    resizes: usize,
}

impl SpreadWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn pages(&self) -> &[PageContainer] {
        &self.pages
    }

    pub fn options(&self) -> Option<&WidgetOptions> {
        self.options.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of resize commands received.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    fn display(&self) -> DisplayMode {
        self.options
            .as_ref()
            .map(|o| o.display)
            .unwrap_or(DisplayMode::Double)
    }

    /// Pages of the spread currently shown.
    pub fn view(&self) -> Vec<u32> {
        spread_view(self.display(), self.current, self.total())
    }
}

impl FlipWidget for SpreadWidget {
    fn mount(&mut self, pages: Vec<PageContainer>, options: &WidgetOptions) -> Result<()> {
        self.size = (options.width, options.height);
        self.options = Some(options.clone());
        self.current = if pages.is_empty() { 0 } else { 1 };
        self.pages = pages;
        self.shown = self.view().into_iter().collect();
        debug!(
            "Spread widget mounted with {} pages ({:?})",
            self.pages.len(),
            options.display
        );
        Ok(())
    }

    fn next(&mut self, events: &mut dyn FlipEvents) {
        let Some(last) = self.view().last().copied() else {
            return;
        };
        if last < self.total() {
            self.turn_to(last + 1, events);
        }
    }

    fn previous(&mut self, events: &mut dyn FlipEvents) {
        let Some(first) = self.view().first().copied() else {
            return;
        };
        if first > 1 {
            self.turn_to(first - 1, events);
        }
    }

    fn turn_to(&mut self, page: u32, events: &mut dyn FlipEvents) {
        if page == self.current || self.pages.is_empty() {
            return;
        }
        let view = spread_view(self.display(), page, self.total());
        if events.turning(page, &view) == TurnDecision::Prevent {
            debug!("Turn to page {} prevented", page);
            return;
        }
        if view.is_empty() {
            warn!("Page {} does not exist in a {}-page widget", page, self.total());
            return;
        }

        let revealed = view[0];
        events.start(revealed);

        let missing: Vec<u32> = view
            .iter()
            .copied()
            .filter(|p| !self.shown.contains(p))
            .collect();
        if !missing.is_empty() {
            events.missing(&missing);
            self.shown.extend(missing);
        }

        self.current = page;
        events.turned(page, &view);
        events.end(revealed, true);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.resizes += 1;
    }

    fn page(&self) -> u32 {
        self.current
    }
}
