//! Shared fixtures for viewer integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use flipview_common::{Error, Result, WidgetOptions};
use flipview_viewer::{FlipEvents, FlipWidget, PageContainer, TurnDecision};

/// Serves assets from memory and records every request.
#[derive(Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: impl Into<String>) -> Self {
        self.assets.insert(path.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl flipview_viewer::AssetFetcher for MemoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        self.requests.lock().unwrap().push(path.to_string());
        self.assets.get(path).cloned().ok_or(Error::HttpStatus {
            path: path.to_string(),
            status: 404,
        })
    }
}

/// Widget fake that records commands and reports every turn as a single page.
#[derive(Default)]
pub struct RecordingWidget {
    pub mounted: Vec<PageContainer>,
    pub commands: Vec<String>,
    pub current: u32,
    /// Pages to report as missing on the next turn
    pub report_missing: Vec<u32>,
}

impl FlipWidget for RecordingWidget {
    fn mount(&mut self, pages: Vec<PageContainer>, _options: &WidgetOptions) -> Result<()> {
        self.current = if pages.is_empty() { 0 } else { 1 };
        self.mounted = pages;
        self.commands.push("mount".to_string());
        Ok(())
    }

    fn next(&mut self, events: &mut dyn FlipEvents) {
        self.commands.push("next".to_string());
        let target = self.current + 1;
        self.turn(target, events);
    }

    fn previous(&mut self, events: &mut dyn FlipEvents) {
        self.commands.push("previous".to_string());
        let target = self.current.saturating_sub(1);
        self.turn(target, events);
    }

    fn turn_to(&mut self, page: u32, events: &mut dyn FlipEvents) {
        self.commands.push(format!("page {}", page));
        self.turn(page, events);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.commands.push(format!("size {}x{}", width, height));
    }

    fn page(&self) -> u32 {
        self.current
    }
}

impl RecordingWidget {
    fn turn(&mut self, page: u32, events: &mut dyn FlipEvents) {
        if events.turning(page, &[page]) == TurnDecision::Prevent {
            self.commands.push(format!("prevented {}", page));
            return;
        }
        let missing = std::mem::take(&mut self.report_missing);
        if !missing.is_empty() {
            events.missing(&missing);
        }
        self.current = page;
        events.turned(page, &[page]);
    }
}

/// Markup source with `total` slides, each holding a text block and an image block.
pub fn deck_markup(total: u32) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\"><link rel=\"stylesheet\" href=\"style.css\"></head>\n<body>\n<div class=\"slides-wrapper\">\n",
    );
    for n in 1..=total {
        html.push_str(&format!(
            "<div class=\"slide\" id=\"slide{n}\" data-slide=\"{n}\" style=\"display: none\">\n\
             <div class=\"text-block\" style=\"left: 10px; top: 20px\"><p>Slide {n} heading</p></div>\n\
             <div class=\"image-block\"><img src=\"images/slide{n}_img1.png\" alt=\"Image\"></div>\n\
             </div>\n"
        ));
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

pub fn manifest(total: u32) -> String {
    let slides: Vec<String> = (1..=total)
        .map(|n| format!("{{\"slide_num\": {n}, \"width\": 960, \"height\": 540, \"shapes_count\": 2}}"))
        .collect();
    format!(
        "{{\"source_file\": \"deck.pptx\", \"total_slides\": {}, \"slides\": [{}]}}",
        total,
        slides.join(", ")
    )
}

pub const STYLESHEET: &str = ".slide { position: relative; }\n.text-block { position: absolute; }\n.image-block { position: absolute; }\n";

/// A fetcher serving a complete, healthy deck of `total` slides.
pub fn healthy_deck(total: u32) -> MemoryFetcher {
    MemoryFetcher::new()
        .with("metadata.json", manifest(total))
        .with("index.html", deck_markup(total))
        .with("style.css", STYLESHEET)
}
