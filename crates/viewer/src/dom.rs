//! Owned element tree
//!
//! Slide fragments, page placeholders and thumbnails are all expressed as
//! [`Element`] values. Cloning an element is a deep copy; nothing in the tree
//! refers back to the document it was parsed from.

use quick_xml::escape::escape;

/// Tag of the synthetic root produced by the markup parser.
pub const DOCUMENT_TAG: &str = "#document";

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// A node in the tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = remaining.join(" ");
        self.set_attr("class", joined);
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Declarations of the inline `style` attribute in source order.
    pub fn styles(&self) -> Vec<(String, String)> {
        parse_style(self.attr("style").unwrap_or_default())
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.styles()
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Set one inline style declaration, replacing an existing one in place.
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut declarations = self.styles();
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some(slot) => slot.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        self.set_attr("style", format_style(&declarations));
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Replace all children with `child`.
    pub fn replace_children(&mut self, child: impl Into<Node>) {
        self.children.clear();
        self.children.push(child.into());
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut stack: Vec<&Element> = self.child_elements().collect();
        stack.reverse();
        while let Some(element) = stack.pop() {
            found.push(element);
            let start = stack.len();
            stack.extend(element.child_elements());
            stack[start..].reverse();
        }
        found
    }

    /// First element in document order (including `self`) with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.descendants().into_iter().find(|e| e.id() == Some(id))
    }

    /// Descendant elements carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|e| e.has_class(class))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serialize the element and its subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        if self.tag == DOCUMENT_TAG {
            write_children(&self.children, false, out);
            return;
        }
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        write_children(&self.children, is_raw_text(&self.tag), out);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn write_children(children: &[Node], raw: bool, out: &mut String) {
    for child in children {
        match child {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => out.push_str(&escape(text.as_str())),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Element(inner) => collect_text(inner, out),
            Node::Text(text) => out.push_str(text),
            Node::Comment(_) => {}
        }
    }
}

/// Split an inline style string into `(property, value)` pairs.
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            Some((name, value.trim().to_string()))
        })
        .collect()
}

pub fn format_style(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .with_attr("id", "slide1")
            .with_attr("class", "slide")
            .with_child(
                Element::new("div")
                    .with_attr("class", "text-block")
                    .with_text("Hello"),
            )
            .with_child(
                Element::new("div")
                    .with_attr("class", "image-block")
                    .with_child(Element::new("img").with_attr("src", "images/a.png")),
            )
    }

    #[test]
    fn test_style_replace_in_place() {
        let mut element =
            Element::new("div").with_attr("style", "background-color: red; display:none");
        element.set_style("display", "block");
        element.set_style("opacity", "1");
        assert_eq!(
            element.attr("style"),
            Some("background-color: red; display: block; opacity: 1")
        );
        assert_eq!(element.style("display").as_deref(), Some("block"));
    }

    #[test]
    fn test_parse_style_ignores_empty_declarations() {
        let declarations = parse_style("color: #666;; ; width:100px;");
        assert_eq!(
            declarations,
            vec![
                ("color".to_string(), "#666".to_string()),
                ("width".to_string(), "100px".to_string())
            ]
        );
    }

    #[test]
    fn test_class_helpers() {
        let mut element = Element::new("div").with_attr("class", "page cover");
        element.add_class("turning");
        assert!(element.has_class("turning"));
        element.add_class("turning");
        assert_eq!(element.attr("class"), Some("page cover turning"));
        element.remove_class("cover");
        assert_eq!(element.attr("class"), Some("page turning"));
        element.toggle_class("turning", false);
        assert_eq!(element.attr("class"), Some("page"));
    }

    #[test]
    fn test_find_and_descendants() {
        let element = sample();
        assert_eq!(element.find_by_id("slide1").map(|e| e.tag()), Some("div"));
        assert_eq!(element.find_by_class("text-block").len(), 1);
        let tags: Vec<&str> = element.descendants().iter().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["div", "div", "img"]);
        assert_eq!(element.text_content(), "Hello");
    }

    #[test]
    fn test_to_html() {
        let html = sample().to_html();
        assert_eq!(
            html,
            "<div id=\"slide1\" class=\"slide\"><div class=\"text-block\">Hello</div>\
             <div class=\"image-block\"><img src=\"images/a.png\"></div></div>"
        );
    }

    #[test]
    fn test_to_html_escapes_text() {
        let element = Element::new("p")
            .with_attr("title", "a \"b\"")
            .with_text("1 < 2 & 3");
        assert_eq!(
            element.to_html(),
            "<p title=\"a &quot;b&quot;\">1 &lt; 2 &amp; 3</p>"
        );
    }
}
