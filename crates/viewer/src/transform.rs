//! Pure clone-and-restyle transforms
//!
//! Every function here takes source content by reference and returns a new
//! element ready for mounting; the source is never modified.

use flipview_common::ThumbnailConfig;

use crate::dom::Element;

/// Inline styles that make a slide clone fill its page edge to edge and leave
/// pointer handling to the page-turn widget.
pub const PAGE_FILL_STYLES: &[(&str, &str)] = &[
    ("display", "block"),
    ("opacity", "1"),
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("margin", "0"),
    ("padding", "0"),
    ("box-shadow", "none"),
    ("pointer-events", "none"),
];

/// Clone a slide fragment for mounting in a page placeholder.
pub fn page_clone(fragment: &Element) -> Element {
    let mut clone = fragment.clone();
    for (property, value) in PAGE_FILL_STYLES {
        clone.set_style(property, value);
    }
    clone
}

/// Clone a slide fragment as a miniature: the slide keeps its full thumbnail
/// geometry, is scaled from its top-left corner and sits inside a clipping
/// wrapper of the same size.
pub fn thumbnail_clone(fragment: &Element, config: &ThumbnailConfig) -> Element {
    let width = format!("{}px", config.width);
    let height = format!("{}px", config.height);
    let scale = format!("scale({})", config.scale);

    let mut clone = fragment.clone();
    for (property, value) in [
        ("display", "block"),
        ("opacity", "1"),
        ("width", width.as_str()),
        ("height", height.as_str()),
        ("transform", scale.as_str()),
        ("transform-origin", "top left"),
        ("position", "relative"),
        ("pointer-events", "none"),
        ("box-shadow", "none"),
    ] {
        clone.set_style(property, value);
    }

    Element::new("div")
        .with_style("width", &width)
        .with_style("height", &height)
        .with_style("overflow", "hidden")
        .with_style("position", "relative")
        .with_child(clone)
}

/// Content shown in a page whose slide has no markup fragment.
pub fn missing_content(ordinal: u32) -> Element {
    Element::new("div")
        .with_attr("class", "page-placeholder")
        .with_attr("data-page", ordinal.to_string())
        .with_style("display", "flex")
        .with_style("align-items", "center")
        .with_style("justify-content", "center")
        .with_style("height", "100%")
        .with_style("background", "white")
        .with_child(
            Element::new("div")
                .with_style("text-align", "center")
                .with_style("color", "#666")
                .with_child(Element::new("h3").with_text(format!("Slide {}", ordinal)))
                .with_child(Element::new("p").with_text("No content available")),
        )
}

/// Coloured tile standing in for a thumbnail without markup.
pub fn thumbnail_tile(ordinal: u32, color: &str, config: &ThumbnailConfig) -> Element {
    Element::new("div")
        .with_style("width", &format!("{}px", config.width))
        .with_style("height", &format!("{}px", config.height))
        .with_style("background", color)
        .with_style("display", "flex")
        .with_style("align-items", "center")
        .with_style("justify-content", "center")
        .with_style("color", "#666")
        .with_text(ordinal.to_string())
}
