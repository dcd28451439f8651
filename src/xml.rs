//! Minimal element tree for the AxioVision `_meta.xml` dialect.
//!
//! The dialect is a flat scheme: a root element holding `<Tags>` blocks and
//! `<pNNN>` per-image elements, with no attributes or namespaces that matter.
//! This module materializes that shape from `quick-xml` events into a small
//! owned tree the tag-section and document parsers can walk by child name.
//! It is deliberately not a general-purpose XML layer.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ParseError;

/// One element of the parsed document: name, accumulated character data and
/// child elements in document order. Attributes are dropped; the dialect does
/// not use them.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Parse a whole document and return its root element.
    ///
    /// Syntax errors are reported with a 1-based line and column so the host
    /// can point the user at the offending spot in the file.
    pub fn parse(src: &str) -> Result<XmlElement, ParseError> {
        let mut reader = Reader::from_str(src);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(syntax_error(
                        src,
                        reader.buffer_position() as usize,
                        e.to_string(),
                    ));
                }
            };

            match event {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    stack.push(XmlElement::new(name));
                }
                Event::Empty(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    attach(&mut stack, &mut root, XmlElement::new(name));
                }
                Event::End(_) => {
                    // quick-xml has already verified the end-tag name matches
                    let element = stack.pop().unwrap_or_else(|| XmlElement::new(String::new()));
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    let unescaped = match text.unescape() {
                        Ok(cow) => cow,
                        Err(e) => {
                            return Err(syntax_error(
                                src,
                                reader.buffer_position() as usize,
                                e.to_string(),
                            ));
                        }
                    };
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&unescaped);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                // Declarations, comments and processing instructions carry
                // nothing the dialect uses.
                _ => {}
            }
        }

        root.ok_or(ParseError::EmptyDocument)
    }

    /// First child element with the given name, if any.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Character data of the first child with the given name, trimmed.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }
}

/// Attach a finished element to its parent, or promote it to root.
fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

/// Build a [`ParseError::MalformedDocument`] with a 1-based line/column
/// computed from the byte offset the reader stopped at.
fn syntax_error(src: &str, byte_offset: usize, message: String) -> ParseError {
    let offset = byte_offset.min(src.len());
    let consumed = &src.as_bytes()[..offset];
    let line = 1 + consumed.iter().filter(|&&b| b == b'\n').count();
    let column = offset - consumed.iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1) + 1;
    ParseError::MalformedDocument {
        line,
        column,
        message,
    }
}

// =============================================================================
// Tests
// =============================================================================
