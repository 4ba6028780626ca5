//! Deck summary for the diagnostic route

use tracing::warn;

use flipview_common::{DeckSummary, Manifest, Result, ViewerConfig};
use flipview_viewer::{AssetFetcher, MarkupSource};

/// Summarize the deck behind `fetcher`.
///
/// A missing or malformed manifest is an error; a missing markup source
/// only yields zero fragments.
pub async fn summarize<F>(fetcher: &F, config: &ViewerConfig) -> Result<DeckSummary>
where
    F: AssetFetcher + ?Sized,
{
    let manifest = Manifest::from_json(&fetcher.fetch_text(&config.manifest).await?)?;

    let markup_fragments = match fetcher.fetch_text(&config.markup).await {
        Ok(html) => match MarkupSource::parse(&html, &config.slide_id_prefix) {
            Ok(source) => source.census(),
            Err(e) => {
                warn!("{} does not parse: {}", config.markup, e);
                0
            }
        },
        Err(e) => {
            warn!("{} unavailable: {}", config.markup, e);
            0
        }
    };

    Ok(DeckSummary {
        source_file: manifest.source_file.clone(),
        total_slides: manifest.total_slides,
        manifest_slides: manifest.slides.len(),
        markup_fragments,
    })
}
