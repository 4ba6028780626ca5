//! Markup source parsing
//!
//! The markup source is the converter's full HTML output. It is parsed once
//! into an owned tree and every element whose id is the slide prefix followed
//! by an ordinal is indexed, so page population only ever clones.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use tracing::debug;

use flipview_common::{slide_element_id, Error, Result};

use crate::dom::{is_raw_text, is_void, Element, Node, DOCUMENT_TAG};

/// Parse an HTML document into an owned tree rooted at a [`DOCUMENT_TAG`] element.
///
/// Void elements need no closing tag, `script`/`style` bodies are kept as raw
/// text, mismatched closing tags close up to the nearest open element of the
/// same name and unclosed elements are closed at end of input.
pub fn parse_html(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut stack: Vec<Element> = vec![Element::new(DOCUMENT_TAG)];

    loop {
        let event = reader.read_event().map_err(|e| Error::Markup {
            position: reader.buffer_position(),
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(start) if !is_tag_name(start.name().as_ref()) => {
                stray_open_bracket(&mut stack, &start, ">");
            }
            Event::Empty(start) if !is_tag_name(start.name().as_ref()) => {
                stray_open_bracket(&mut stack, &start, "/>");
            }
            Event::Start(start) => {
                let mut element = element_from_start(&start);
                if is_void(element.tag()) {
                    append(&mut stack, element.into());
                } else if is_raw_text(element.tag()) {
                    let end = start.to_end();
                    let body = reader.read_text(end.name()).map_err(|e| Error::Markup {
                        position: reader.buffer_position(),
                        reason: e.to_string(),
                    })?;
                    if !body.is_empty() {
                        element.push(Node::Text(body.into_owned()));
                    }
                    append(&mut stack, element.into());
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(start) => {
                append(&mut stack, element_from_start(&start).into());
            }
            Event::End(end) => {
                close_named(&mut stack, &lowercase_name(end.name().as_ref()));
            }
            Event::Text(text) => {
                append(
                    &mut stack,
                    Node::Text(decode_entities(&String::from_utf8_lossy(&text))),
                );
            }
            Event::CData(data) => {
                append(&mut stack, Node::Text(String::from_utf8_lossy(&data).into_owned()));
            }
            Event::Comment(comment) => {
                append(
                    &mut stack,
                    Node::Comment(String::from_utf8_lossy(&comment).into_owned()),
                );
            }
            Event::Eof => break,
            // declarations, doctype and processing instructions carry no content
            _ => {}
        }
    }

    close_until(&mut stack, 1);
    stack
        .pop()
        .ok_or_else(|| Error::Internal("markup parser lost its document root".to_string()))
}

fn element_from_start(start: &BytesStart<'_>) -> Element {
    let mut element = Element::new(lowercase_name(start.name().as_ref()));
    for attr in start.html_attributes().with_checks(false).flatten() {
        let name = lowercase_name(attr.key.as_ref());
        let value = decode_entities(&String::from_utf8_lossy(&attr.value));
        element.set_attr(name, value);
    }
    element
}

fn append(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.push(node);
    }
}

/// `<` starts a tag only when a letter follows it; anything else is text.
fn is_tag_name(name: &[u8]) -> bool {
    name.first().is_some_and(|b| b.is_ascii_alphabetic())
}

/// Turn a tag quick-xml opened at a text `<` back into text.
///
/// The reader runs such a tag to the next `>`, so a closing tag written
/// right after the text ends up inside it and is closed here instead.
fn stray_open_bracket(stack: &mut Vec<Element>, start: &BytesStart<'_>, terminator: &str) {
    let raw = String::from_utf8_lossy(start);
    match raw.split_once("</") {
        Some((text, closing)) => {
            append(stack, Node::Text(format!("<{}", decode_entities(text))));
            close_named(stack, &closing.trim().to_ascii_lowercase());
        }
        None => append(
            stack,
            Node::Text(format!("<{}{}", decode_entities(&raw), terminator)),
        ),
    }
}

/// Close the nearest open element named `name`; stray closing tags are dropped.
fn close_named(stack: &mut Vec<Element>, name: &str) {
    if let Some(position) = stack.iter().rposition(|e| e.tag() == name) {
        if position > 0 {
            close_until(stack, position);
        }
    }
}

/// Pop open elements until `depth` remain, attaching each to its parent.
fn close_until(stack: &mut Vec<Element>, depth: usize) {
    while stack.len() > depth {
        let Some(element) = stack.pop() else { break };
        append(stack, element.into());
    }
}

fn lowercase_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

/// Longest reference name looked at after an `&`
const MAX_REFERENCE_LEN: usize = 32;

/// Decode character references one at a time.
///
/// Known named references and numeric references are resolved; an `&` that
/// does not start one stays a literal `&`, as in an HTML parser.
fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let reference = tail
            .find(';')
            .filter(|end| *end <= MAX_REFERENCE_LEN)
            .and_then(|end| resolve_reference(&tail[..end]).map(|c| (end, c)));
        match reference {
            Some((end, resolved)) => {
                out.push_str(&resolved);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_reference(name: &str) -> Option<String> {
    let Some(number) = name.strip_prefix('#') else {
        return resolve_entity(name).map(str::to_string);
    };
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse::<u32>().ok()?,
    };
    char::from_u32(code).map(String::from)
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    let resolved = match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "larr" => "\u{2190}",
        "rarr" => "\u{2192}",
        "bull" => "\u{2022}",
        _ => return None,
    };
    Some(resolved)
}

/// Parsed markup source with slide fragments indexed by ordinal.
#[derive(Debug, Clone)]
pub struct MarkupSource {
    prefix: String,
    fragments: BTreeMap<u32, Element>,
    census: usize,
}

impl MarkupSource {
    /// Parse `html` and index every `<prefix><ordinal>` element.
    ///
    /// When an id occurs more than once the first element in document order
    /// wins.
    pub fn parse(html: &str, prefix: &str) -> Result<Self> {
        let document = parse_html(html)?;
        Ok(Self::from_document(&document, prefix))
    }

    pub fn from_document(document: &Element, prefix: &str) -> Self {
        let mut fragments = BTreeMap::new();
        let mut census = 0;
        for element in document.descendants() {
            let Some(id) = element.id() else { continue };
            let Some(suffix) = id.strip_prefix(prefix) else {
                continue;
            };
            census += 1;
            let Ok(ordinal) = suffix.parse::<u32>() else {
                continue;
            };
            if ordinal == 0 || slide_element_id(prefix, ordinal) != id {
                continue;
            }
            fragments.entry(ordinal).or_insert_with(|| element.clone());
        }
        debug!(
            "Indexed {} slide fragments ({} ids with prefix {:?})",
            fragments.len(),
            census,
            prefix
        );
        Self {
            prefix: prefix.to_string(),
            fragments,
            census,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fragment for `ordinal`, if the markup defines one.
    pub fn fragment(&self, ordinal: u32) -> Option<&Element> {
        self.fragments.get(&ordinal)
    }

    pub fn contains(&self, ordinal: u32) -> bool {
        self.fragments.contains_key(&ordinal)
    }

    /// Number of addressable fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of elements whose id starts with the prefix, addressable or not.
    pub fn census(&self) -> usize {
        self.census
    }

    pub fn ordinals(&self) -> impl Iterator<Item = u32> + '_ {
        self.fragments.keys().copied()
    }
}
