//! Core types for FlipView

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// A deck manifest as written next to the converted slides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Path of the presentation the deck was converted from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    /// Slide count as reported by the converter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_slides: Option<u32>,

    /// Slides in page order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slides: Vec<SlideEntry>,
}

/// A `null` list reads as an empty one.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One slide record of the manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideEntry {
    pub slide_num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    ///
    /// A document that is valid JSON but not an object is rejected; a missing
    /// or `null` `slides` array yields an empty deck.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidManifest(
                "top-level value is not an object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Convert the manifest into page-ordered slide descriptors.
    ///
    /// Page order is manifest order; an entry whose `slide_num` disagrees with
    /// its position is renumbered to its position.
    pub fn descriptors(&self) -> Vec<SlideDescriptor> {
        self.slides
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let ordinal = index as u32 + 1;
                if entry.slide_num != ordinal {
                    warn!(
                        "Manifest entry {} has slide_num {}, using position",
                        ordinal, entry.slide_num
                    );
                }
                SlideDescriptor {
                    ordinal,
                    image: entry.image.clone(),
                    background_color: entry.background_color.clone(),
                }
            })
            .collect()
    }
}

/// A page of the deck: 1-based ordinal plus optional presentation hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    pub ordinal: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
}

impl SlideDescriptor {
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            image: None,
            background_color: None,
        }
    }

    /// Build descriptors for slides already present in the host page, given
    /// each one's `data-image` attribute.
    pub fn from_host_slides(images: Vec<Option<String>>) -> Vec<Self> {
        images
            .into_iter()
            .enumerate()
            .map(|(index, image)| {
                let ordinal = index as u32 + 1;
                Self {
                    ordinal,
                    image: Some(image.unwrap_or_else(|| format!("slide{}.jpg", ordinal))),
                    background_color: None,
                }
            })
            .collect()
    }
}

/// Discrete zoom levels of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    /// Neutral level before either zoom control is used
    #[default]
    Fit,
    In,
    Out,
}

impl std::fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoomLevel::Fit => write!(f, "fit"),
            ZoomLevel::In => write!(f, "in"),
            ZoomLevel::Out => write!(f, "out"),
        }
    }
}

/// Diagnostic summary of a deck directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckSummary {
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub total_slides: Option<u32>,
    /// Number of entries in the manifest `slides` array
    pub manifest_slides: usize,
    /// Number of elements in the markup source whose id carries the slide prefix
    pub markup_fragments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_from_converter_output() {
        let json = r##"{
            "source_file": "deck.pptx",
            "total_slides": 2,
            "slides": [
                {"slide_num": 1, "width": 960.0, "height": 540.0, "shapes_count": 4},
                {"slide_num": 2, "image": "slide2.jpg", "background_color": "#112233"}
            ]
        }"##;
        let manifest = Manifest::from_json(json).unwrap();
        assert_eq!(manifest.total_slides, Some(2));
        assert_eq!(manifest.source_file.as_deref(), Some("deck.pptx"));

        let descriptors = manifest.descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0], SlideDescriptor::new(1));
        assert_eq!(descriptors[1].image.as_deref(), Some("slide2.jpg"));
        assert_eq!(descriptors[1].background_color.as_deref(), Some("#112233"));
    }

    #[test]
    fn test_manifest_without_slides_is_empty() {
        let manifest = Manifest::from_json(r#"{"total_slides": 0}"#).unwrap();
        assert!(manifest.descriptors().is_empty());
    }

    #[test]
    fn test_manifest_with_null_slides_is_empty() {
        let manifest = Manifest::from_json(r#"{"total_slides": 3, "slides": null}"#).unwrap();
        assert!(manifest.slides.is_empty());
        assert!(manifest.descriptors().is_empty());
        assert_eq!(manifest.total_slides, Some(3));
    }

    #[test]
    fn test_manifest_rejects_non_object() {
        assert!(matches!(
            Manifest::from_json("[1, 2]"),
            Err(Error::InvalidManifest(_))
        ));
        assert!(matches!(
            Manifest::from_json("{not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_descriptors_follow_manifest_order() {
        let manifest = Manifest::from_json(
            r#"{"slides": [{"slide_num": 3}, {"slide_num": 1}, {"slide_num": 2}]}"#,
        )
        .unwrap();
        let ordinals: Vec<u32> = manifest.descriptors().iter().map(|d| d.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn test_host_slide_fallback_images() {
        let descriptors =
            SlideDescriptor::from_host_slides(vec![Some("cover.png".to_string()), None]);
        assert_eq!(descriptors[0].image.as_deref(), Some("cover.png"));
        assert_eq!(descriptors[1].image.as_deref(), Some("slide2.jpg"));
        assert_eq!(descriptors[1].ordinal, 2);
    }
}
