//! XML parser on top of quick-xml.
//!
//! Lifting rules: an element becomes an object, attributes become `@name`
//! keys, text and CDATA content becomes `#text`, and repeated sibling tags
//! collapse into an array under their tag. An element with no attributes and
//! no children collapses to its text string (or null when empty). The
//! document root element appears as the single key of the returned object.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::Parser;
use crate::error::ParseError;
use crate::value::{Map, Value};

/// Parses XML documents. Namespace prefixes are stripped from element and
/// attribute names by default; [`XmlParser::preserving_namespaces`] keeps
/// them as part of the key.
pub struct XmlParser {
    preserve_namespaces: bool,
}

impl XmlParser {
    pub fn new() -> Self {
        XmlParser {
            preserve_namespaces: false,
        }
    }

    /// Keep `ns:tag` and `ns:attr` names (and `xmlns` declarations) verbatim.
    pub fn preserving_namespaces() -> Self {
        XmlParser {
            preserve_namespaces: true,
        }
    }
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// An element under construction: attributes land in `fields` immediately,
/// child elements as they close, text segments accumulate separately.
struct Node {
    name: String,
    fields: Map,
    text: String,
}

impl Parser for XmlParser {
    fn format_name(&self) -> &'static str {
        "xml"
    }

    fn parse(&self, input: &[u8]) -> Result<Value, ParseError> {
        let text = std::str::from_utf8(input).map_err(|e| ParseError {
            format: "xml",
            byte_offset: Some(e.valid_up_to()),
            message: "input is not valid UTF-8".to_string(),
        })?;

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        // Synthetic document frame below the stack; the root element closes
        // into it.
        let mut stack: Vec<Node> = vec![Node {
            name: String::new(),
            fields: Map::new(),
            text: String::new(),
        }];
        let mut root_children = 0usize;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| err_at(&reader, e.to_string()))?;
            match event {
                Event::Start(start) => {
                    self.open(&mut stack, &mut root_children, &reader, &start)?;
                }
                Event::Empty(start) => {
                    let name = start.name().as_ref().to_vec();
                    self.open(&mut stack, &mut root_children, &reader, &start)?;
                    self.close(&mut stack, &reader, &name)?;
                }
                Event::End(end) => {
                    self.close(&mut stack, &reader, end.name().as_ref())?;
                }
                Event::Text(t) => {
                    let decoded = t.unescape().map_err(|e| err_at(&reader, e.to_string()))?;
                    if stack.len() == 1 && !decoded.trim().is_empty() {
                        return Err(err_at(&reader, "text outside the root element".to_string()));
                    }
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&decoded);
                    }
                }
                Event::CData(cdata) => {
                    let bytes = cdata.into_inner();
                    let decoded = std::str::from_utf8(&bytes)
                        .map_err(|_| err_at(&reader, "CDATA is not valid UTF-8".to_string()))?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(decoded);
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, DOCTYPE.
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(err_at(&reader, "unexpected end of input".to_string()));
        }
        if root_children == 0 {
            return Err(err_at(&reader, "no root element".to_string()));
        }
        let doc = stack.pop().expect("document frame");
        Ok(Value::Object(doc.fields))
    }
}

impl XmlParser {
    /// Push a new element frame, capturing its attributes.
    fn open(
        &self,
        stack: &mut Vec<Node>,
        root_children: &mut usize,
        reader: &Reader<&[u8]>,
        start: &BytesStart<'_>,
    ) -> Result<(), ParseError> {
        if stack.len() == 1 {
            *root_children += 1;
            if *root_children > 1 {
                return Err(err_at(reader, "multiple root elements".to_string()));
            }
        }
        let mut node = Node {
            name: self.lift_name(start.name().as_ref()),
            fields: Map::new(),
            text: String::new(),
        };
        for attr in start.attributes() {
            let attr = attr.map_err(|e| err_at(reader, e.to_string()))?;
            let key = attr.key.as_ref();
            if !self.preserve_namespaces && is_xmlns(key) {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|e| err_at(reader, e.to_string()))?;
            node.fields.insert(
                format!("@{}", self.lift_name(key)),
                Value::String(value.into_owned()),
            );
        }
        stack.push(node);
        Ok(())
    }

    /// Pop the current element, finalize it, and attach it to its parent with
    /// sibling collapse.
    fn close(
        &self,
        stack: &mut Vec<Node>,
        reader: &Reader<&[u8]>,
        end_name: &[u8],
    ) -> Result<(), ParseError> {
        if stack.len() < 2 {
            return Err(err_at(reader, "unexpected closing tag".to_string()));
        }
        let node = stack.pop().expect("element frame");
        let expected = self.lift_name(end_name);
        if node.name != expected {
            return Err(err_at(
                reader,
                format!(
                    "mismatched closing tag </{}>, expected </{}>",
                    expected, node.name
                ),
            ));
        }

        let value = finalize(node.fields, node.text);
        let parent = stack.last_mut().expect("parent frame");
        insert_child(&mut parent.fields, node.name, value);
        Ok(())
    }

    fn lift_name(&self, raw: &[u8]) -> String {
        let name = String::from_utf8_lossy(raw);
        if self.preserve_namespaces {
            name.into_owned()
        } else {
            strip_ns_prefix(&name).to_string()
        }
    }
}

/// Turn a closed element into a value: text-only elements collapse to their
/// string, empty elements to null, everything else stays an object with an
/// optional trailing `#text`.
fn finalize(mut fields: Map, text: String) -> Value {
    let text = text.trim().to_string();
    if fields.is_empty() {
        if text.is_empty() {
            Value::Null
        } else {
            Value::String(text)
        }
    } else {
        if !text.is_empty() {
            fields.insert("#text".to_string(), Value::String(text));
        }
        Value::Object(fields)
    }
}

/// Attach a child under its tag; repeated siblings collapse into an array at
/// the first occurrence's position.
fn insert_child(fields: &mut Map, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(arr)) => arr.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::Null);
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

fn strip_ns_prefix(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

fn is_xmlns(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

fn err_at(reader: &Reader<&[u8]>, message: String) -> ParseError {
    ParseError {
        format: "xml",
        byte_offset: Some(reader.buffer_position() as usize),
        message,
    }
}
