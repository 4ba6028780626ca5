//! Deck consistency: manifest ordinals against markup fragments

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use flipview_common::{slide_element_id, Manifest, ViewerConfig};
use flipview_viewer::{AssetFetcher, MarkupSource};

use crate::error::E2eResult;
use crate::probe::{CheckResult, ProbeResult};

/// Fragments sampled for their content blocks
const SAMPLED_FRAGMENTS: u32 = 3;

/// Content blocks of one markup fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentSample {
    pub ordinal: u32,
    pub text_blocks: usize,
    pub image_blocks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckReport {
    /// Slide count the manifest reports, or its slide list length
    pub expected: u32,
    pub found: u32,
    pub missing: Vec<u32>,
    pub samples: Vec<FragmentSample>,
}

impl DeckReport {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty()
    }

    /// Report as tallied results: the ordinal check and one per sample.
    pub fn to_results(&self, prefix: &str) -> Vec<ProbeResult> {
        let mut results = vec![ProbeResult::from_checks(
            "deck-consistency",
            false,
            vec![CheckResult {
                check: format!("{} of {} slides in markup", self.found, self.expected),
                passed: self.is_consistent(),
                detail: if self.missing.is_empty() {
                    "all present".to_string()
                } else {
                    format!("missing {:?}", self.missing)
                },
            }],
        )];

        for ordinal in 1..=self.expected.min(SAMPLED_FRAGMENTS) {
            let id = slide_element_id(prefix, ordinal);
            let check = match self.samples.iter().find(|s| s.ordinal == ordinal) {
                Some(sample) => CheckResult {
                    check: format!("#{} cloneable", id),
                    passed: true,
                    detail: format!(
                        "{} text blocks, {} image blocks",
                        sample.text_blocks, sample.image_blocks
                    ),
                },
                None => CheckResult {
                    check: format!("#{} cloneable", id),
                    passed: false,
                    detail: "not found".to_string(),
                },
            };
            results.push(ProbeResult::from_checks(
                format!("fragment-{}", ordinal),
                false,
                vec![check],
            ));
        }
        results
    }
}

/// Compare the manifest with the markup source behind `fetcher`.
pub async fn check_deck<F>(fetcher: &F, config: &ViewerConfig) -> E2eResult<DeckReport>
where
    F: AssetFetcher + ?Sized,
{
    let manifest = Manifest::from_json(&fetcher.fetch_text(&config.manifest).await?)?;
    let source = MarkupSource::parse(
        &fetcher.fetch_text(&config.markup).await?,
        &config.slide_id_prefix,
    )?;

    let expected = manifest
        .total_slides
        .unwrap_or(manifest.slides.len() as u32);
    let missing: Vec<u32> = (1..=expected).filter(|n| !source.contains(*n)).collect();

    let samples = (1..=expected.min(SAMPLED_FRAGMENTS))
        .filter_map(|ordinal| {
            source.fragment(ordinal).map(|fragment| FragmentSample {
                ordinal,
                text_blocks: fragment.find_by_class("text-block").len(),
                image_blocks: fragment.find_by_class("image-block").len(),
            })
        })
        .collect();

    let report = DeckReport {
        expected,
        found: expected - missing.len() as u32,
        missing,
        samples,
    };
    info!(
        "Deck consistency: {} of {} slides present",
        report.found, report.expected
    );
    Ok(report)
}

/// Run the deck check as tallied results.
pub async fn deck_results<F>(fetcher: &F, config: &ViewerConfig) -> Vec<ProbeResult>
where
    F: AssetFetcher + ?Sized,
{
    let start = Instant::now();
    match check_deck(fetcher, config).await {
        Ok(report) => report
            .to_results(&config.slide_id_prefix)
            .into_iter()
            .map(|r| r.with_duration(start.elapsed()))
            .collect(),
        Err(e) => vec![ProbeResult::failure("deck-consistency", false, e).with_duration(start.elapsed())],
    }
}
