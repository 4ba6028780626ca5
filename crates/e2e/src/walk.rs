//! Headless walk: drive the real viewer through every page of a deck

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use flipview_common::ViewerConfig;
use flipview_viewer::{counter_text, AssetFetcher, HeadlessSurface, SpreadWidget, SurfaceSnapshot, Viewer};

use crate::probe::{CheckResult, ProbeResult};

/// Class carried by synthesized fallback content
const PLACEHOLDER_CLASS: &str = "page-placeholder";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkReport {
    pub total: u32,
    /// Pages the viewer stopped on, in order
    pub visited: Vec<u32>,
    pub unpopulated: Vec<u32>,
    /// Pages showing synthesized fallback content
    pub placeholders: Vec<u32>,
    /// Pages whose counter text was wrong when visited
    pub counter_mismatches: Vec<u32>,
    pub final_state: Option<SurfaceSnapshot>,
}

impl WalkReport {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.unpopulated.is_empty() && self.counter_mismatches.is_empty()
    }

    pub fn to_result(&self) -> ProbeResult {
        let checks = vec![
            CheckResult {
                check: "deck has pages".to_string(),
                passed: self.total > 0,
                detail: format!("{} pages", self.total),
            },
            CheckResult {
                check: "every page populated".to_string(),
                passed: self.unpopulated.is_empty(),
                detail: if self.unpopulated.is_empty() {
                    format!(
                        "visited {:?}, {} with fallback content",
                        self.visited,
                        self.placeholders.len()
                    )
                } else {
                    format!("empty {:?}", self.unpopulated)
                },
            },
            CheckResult {
                check: "page counter".to_string(),
                passed: self.counter_mismatches.is_empty(),
                detail: format!("mismatches {:?}", self.counter_mismatches),
            },
        ];
        ProbeResult::from_checks("headless-walk", false, checks)
    }
}

/// Start a viewer over `fetcher` and turn forward until the last page.
pub async fn walk_deck<F>(fetcher: &F, config: ViewerConfig) -> WalkReport
where
    F: AssetFetcher + ?Sized,
{
    let mut viewer = Viewer::start(config, fetcher, HeadlessSurface::new(), SpreadWidget::new()).await;
    let total = viewer.state().total;

    let mut visited = Vec::new();
    let mut counter_mismatches = Vec::new();
    if total > 0 {
        viewer.first();
        loop {
            let current = viewer.state().current;
            visited.push(current);
            if viewer.surface().counter() != counter_text(current, total) {
                counter_mismatches.push(current);
            }
            if viewer.widget().view().last() == Some(&total) {
                break;
            }
            viewer.next();
            if viewer.state().current == current {
                warn!("Viewer did not advance past page {}", current);
                break;
            }
        }
    }

    let unpopulated = viewer
        .pages()
        .iter()
        .filter(|p| !p.is_populated())
        .map(|p| p.ordinal())
        .collect();
    let placeholders = viewer
        .pages()
        .iter()
        .filter(|p| p.content().map(|c| c.has_class(PLACEHOLDER_CLASS)).unwrap_or(false))
        .map(|p| p.ordinal())
        .collect();

    let report = WalkReport {
        total,
        visited,
        unpopulated,
        placeholders,
        counter_mismatches,
        final_state: Some(viewer.surface().snapshot()),
    };
    info!(
        "Walked {} of {} pages ({} empty)",
        report.visited.len(),
        report.total,
        report.unpopulated.len()
    );
    report
}

/// Run the walk as a tallied result.
pub async fn walk_result<F>(fetcher: &F, config: ViewerConfig) -> ProbeResult
where
    F: AssetFetcher + ?Sized,
{
    let start = Instant::now();
    walk_deck(fetcher, config)
        .await
        .to_result()
        .with_duration(start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipview_viewer::DirFetcher;
    use tempfile::TempDir;

    fn deck(total: u32, with_markup: bool) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let slides: Vec<String> = (1..=total)
            .map(|n| format!(r#"{{"slide_num": {}}}"#, n))
            .collect();
        std::fs::write(
            tmp.path().join("metadata.json"),
            format!(r#"{{"total_slides": {}, "slides": [{}]}}"#, total, slides.join(",")),
        )
        .unwrap();
        if with_markup {
            let fragments: String = (1..=total)
                .map(|n| format!(r#"<div class="slide" id="slide{}"><p>{}</p></div>"#, n, n))
                .collect();
            std::fs::write(tmp.path().join("index.html"), fragments).unwrap();
        }
        tmp
    }

    #[tokio::test]
    async fn test_walk_populates_every_page() {
        let tmp = deck(9, true);
        let report = walk_deck(&DirFetcher::new(tmp.path()), ViewerConfig::default()).await;

        assert_eq!(report.total, 9);
        assert_eq!(report.visited, vec![1, 2, 4, 6, 8]);
        assert!(report.unpopulated.is_empty());
        assert!(report.placeholders.is_empty());
        assert!(report.is_complete());
        assert!(report.to_result().success);
    }

    #[tokio::test]
    async fn test_walk_without_markup_uses_fallback() {
        let tmp = deck(4, false);
        let report = walk_deck(&DirFetcher::new(tmp.path()), ViewerConfig::default()).await;

        assert!(report.unpopulated.is_empty());
        assert_eq!(report.placeholders, vec![1, 2, 3, 4]);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_walk_empty_deck_fails() {
        let tmp = TempDir::new().unwrap();
        let result = walk_result(&DirFetcher::new(tmp.path()), ViewerConfig::default()).await;
        assert!(!result.success);
    }
}
