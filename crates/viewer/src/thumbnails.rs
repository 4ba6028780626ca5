//! Thumbnail panel construction

use tracing::debug;

use flipview_common::{SlideDescriptor, ThumbnailConfig};

use crate::dom::Element;
use crate::markup::MarkupSource;
use crate::surface::Thumbnail;
use crate::transform::{thumbnail_clone, thumbnail_tile};

/// Build one thumbnail per slide; the first one starts active.
pub fn build_thumbnails(
    slides: &[SlideDescriptor],
    markup: Option<&MarkupSource>,
    config: &ThumbnailConfig,
) -> Vec<Thumbnail> {
    let thumbnails: Vec<Thumbnail> = slides
        .iter()
        .enumerate()
        .map(|(index, slide)| {
            let preview = match markup.and_then(|m| m.fragment(slide.ordinal)) {
                Some(fragment) => thumbnail_clone(fragment, config),
                None => {
                    let color = slide
                        .background_color
                        .as_deref()
                        .unwrap_or(config.placeholder_color.as_str());
                    thumbnail_tile(slide.ordinal, color, config)
                }
            };

            let mut element = Element::new("div")
                .with_attr("class", "thumbnail")
                .with_attr("data-page", slide.ordinal.to_string())
                .with_child(preview)
                .with_child(
                    Element::new("div")
                        .with_attr("class", "thumbnail-number")
                        .with_text(slide.ordinal.to_string()),
                );
            if index == 0 {
                element.add_class("active");
            }

            Thumbnail {
                ordinal: slide.ordinal,
                element,
            }
        })
        .collect();

    debug!("Built {} thumbnails", thumbnails.len());
    thumbnails
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slides(total: u32) -> Vec<SlideDescriptor> {
        (1..=total).map(SlideDescriptor::new).collect()
    }

    #[test]
    fn test_first_thumbnail_active() {
        let thumbnails = build_thumbnails(&slides(3), None, &ThumbnailConfig::default());
        let active: Vec<u32> = thumbnails
            .iter()
            .filter(|t| t.is_active())
            .map(|t| t.ordinal)
            .collect();
        assert_eq!(active, vec![1]);
        assert_eq!(thumbnails[2].element.attr("data-page"), Some("3"));
    }

    #[test]
    fn test_clone_or_tile() {
        let markup = MarkupSource::parse(
            "<div id=\"slide1\" class=\"slide\"><div class=\"text-block\">a</div></div>",
            "slide",
        )
        .unwrap();
        let mut deck = slides(2);
        deck[1].background_color = Some("#336699".to_string());

        let thumbnails = build_thumbnails(&deck, Some(&markup), &ThumbnailConfig::default());

        let first_preview = thumbnails[0].element.child_elements().next().unwrap();
        assert_eq!(first_preview.style("overflow").as_deref(), Some("hidden"));
        assert_eq!(first_preview.find_by_class("text-block").len(), 1);

        let second_preview = thumbnails[1].element.child_elements().next().unwrap();
        assert_eq!(second_preview.style("background").as_deref(), Some("#336699"));

        let label = thumbnails[1].element.find_by_class("thumbnail-number");
        assert_eq!(label[0].text_content(), "2");
    }
}
