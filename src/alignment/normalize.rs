/*!
 * Canonical re-serialization of markup fragments.
 *
 * The fragment is parsed into a small tree and written back out: empty
 * elements self-close, attribute values are double-quoted, unclosed elements
 * are closed at the end of the fragment and stray closing tags are dropped.
 * Entity references are never decoded; a bare `&` becomes `&amp;` and
 * attribute values have their markup characters escaped.
 */

use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use crate::errors::TransformError;

// @const: Character or entity reference at the start of the input
static ENTITY_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:#[0-9]+|#x[0-9A-Fa-f]+|[A-Za-z_][A-Za-z0-9._\-]*);").expect("Invalid entity regex")
});

/// Escape `raw`, keeping well-formed entity references as they are
///
/// Outside attributes only bare ampersands need escaping.
fn escape_keeping_entities(raw: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let push_run = |out: &mut String, run: &str| {
        if in_attribute {
            out.push_str(&escape(run));
        } else {
            out.push_str(run);
        }
    };

    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        push_run(&mut out, &rest[..amp]);
        let tail = &rest[amp..];
        match ENTITY_REF.find(tail) {
            Some(entity) => {
                out.push_str(entity.as_str());
                rest = &tail[entity.end()..];
            }
            None => {
                out.push_str("&amp;");
                rest = &tail[1..];
            }
        }
    }
    push_run(&mut out, rest);
    out
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    Instruction(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, position: u64) -> Result<Self, TransformError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        let mut iter = start.html_attributes();
        iter.with_checks(false);
        for attribute in iter {
            let attribute = attribute.map_err(|e| TransformError::Markup {
                position,
                message: e.to_string(),
            })?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = escape_keeping_entities(&String::from_utf8_lossy(&attribute.value), true);
            attributes.push((key, value));
        }

        Ok(Self { name, attributes, children: Vec::new() })
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_to(out),
            Node::Text(text) => out.push_str(&escape_keeping_entities(text, false)),
            Node::CData(text) => {
                out.push_str("<![CDATA[");
                out.push_str(text);
                out.push_str("]]>");
            }
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Node::Instruction(text) => {
                out.push_str("<?");
                out.push_str(text);
                out.push_str("?>");
            }
        }
    }
}

/// Open elements while the fragment is being read
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self { root: Vec::new(), open: Vec::new() }
    }

    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn close_top(&mut self) {
        if let Some(element) = self.open.pop() {
            self.push(Node::Element(element));
        }
    }

    fn close(&mut self, name: &str) {
        // Unknown closing tags are dropped
        let Some(index) = self.open.iter().rposition(|element| element.name == name) else {
            return;
        };
        while self.open.len() > index {
            self.close_top();
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.root
    }
}

/// Re-serializes markup into canonical well-formed XML
pub struct MarkupNormalizer;

impl MarkupNormalizer {
    pub fn normalize(text: &str) -> Result<String, TransformError> {
        let nodes = Self::parse(text)?;

        let mut out = String::with_capacity(text.len() + 8);
        for node in &nodes {
            node.write_to(&mut out);
        }
        Ok(out)
    }

    fn parse(text: &str) -> Result<Vec<Node>, TransformError> {
        let mut reader = Reader::from_str(text);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut builder = TreeBuilder::new();

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader.read_event().map_err(|e| TransformError::Markup {
                position: reader.error_position() as u64,
                message: e.to_string(),
            })?;

            match event {
                Event::Start(start) => {
                    let element = Element::from_start(&start, position)?;
                    builder.open.push(element);
                }
                Event::Empty(start) => {
                    let element = Element::from_start(&start, position)?;
                    builder.push(Node::Element(element));
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    builder.close(&name);
                }
                Event::Text(content) => {
                    if !content.is_empty() {
                        builder.push(Node::Text(String::from_utf8_lossy(&content).into_owned()));
                    }
                }
                Event::CData(content) => {
                    builder.push(Node::CData(String::from_utf8_lossy(&content).into_owned()));
                }
                Event::Comment(content) => {
                    builder.push(Node::Comment(String::from_utf8_lossy(&content).into_owned()));
                }
                Event::PI(content) => {
                    builder.push(Node::Instruction(String::from_utf8_lossy(&content).into_owned()));
                }
                // A declaration or doctype has no place inside a segment
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        Ok(builder.finish())
    }
}
