//! Minimal XML tree built on quick-xml events.
//!
//! WFS servers disagree on namespace URIs and prefixes, so the tree keeps
//! qualified names as written and all matching is done on local names.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::ParseError;

/// Deepest element nesting accepted by [`parse_document`]. Tree walks and
/// drops recurse per level, so the limit also bounds stack use.
pub const MAX_DEPTH: usize = 256;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its qualified name, attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

/// Strip the namespace prefix (`gml:posList` -> `posList`).
pub fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::Xml {
                position: 0,
                message: format!("bad attribute on <{}>: {}", name, e),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::Xml {
                    position: 0,
                    message: e.to_string(),
                })?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Local part of the element name.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Attribute value by local name, ignoring any prefix.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local_name(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Text directly inside this element, or `None` if there is none.
    pub fn text(&self) -> Option<String> {
        let mut text = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                text.push_str(t);
            }
        }
        (!text.is_empty()).then_some(text)
    }

    /// This element and all descendants in document order.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            out.push(el);
            let children: Vec<_> = el.child_elements().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// First element in document order whose local name satisfies `pred`.
    pub fn find(&self, pred: impl Fn(&str) -> bool) -> Option<&XmlElement> {
        self.descendants()
            .into_iter()
            .find(|el| pred(el.local_name()))
    }

    /// Serialize this element and its subtree back to markup.
    pub fn to_markup(&self) -> Result<String, ParseError> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| ParseError::Serialize(e.to_string()))
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), ParseError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (k, v) in &self.attributes {
            start.push_attribute((k.as_str(), v.as_str()));
        }

        if self.children.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| ParseError::Serialize(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| ParseError::Serialize(e.to_string()))?;
        for node in &self.children {
            match node {
                XmlNode::Element(child) => child.write_to(writer)?,
                XmlNode::Text(t) => writer
                    .write_event(Event::Text(BytesText::new(t)))
                    .map_err(|e| ParseError::Serialize(e.to_string()))?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| ParseError::Serialize(e.to_string()))
    }
}

/// Parse a complete document (or a standalone fragment) into a tree.
pub fn parse_document(xml: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Xml {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(ParseError::TooDeep {
                        limit: MAX_DEPTH,
                        position: reader.buffer_position(),
                    });
                }
                stack.push(XmlElement::from_start(&e)?);
            }
            Event::Empty(e) => {
                let el = XmlElement::from_start(&e)?;
                attach(&mut stack, &mut root, el);
            }
            Event::End(_) => {
                let el = stack.pop().ok_or_else(|| ParseError::Xml {
                    position: reader.buffer_position(),
                    message: "unexpected closing tag".to_string(),
                })?;
                attach(&mut stack, &mut root, el);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| ParseError::Xml {
                    position: reader.buffer_position(),
                    message: e.to_string(),
                })?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text.into_owned()));
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::UnclosedElement(open.name));
    }
    root.ok_or(ParseError::NoRootElement)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => {}
    }
}
