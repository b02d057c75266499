//! Load CMSIS-SVD text into a materialized element tree using quick-xml.
//!
//! The tree is namespace-normalized (element and attribute names are reduced
//! to their local part, `xmlns` declarations are dropped) and whitespace
//! trimmed, which is the shape the device model decoder expects.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml: {0}")]
    Xml(String),
    #[error("invalid document: {0}")]
    Invalid(String),
}

/// A single element of the document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Local tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Character data directly owned by this element, trimmed.
    ///
    /// Text of descendant elements is not included; SVD only carries text in
    /// leaf elements.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Direct child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

}

/// Parse an SVD document and return its root element.
pub fn parse(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(open_element(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let element = open_element(&e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Invalid("unbalanced closing tag".into()))?;
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|err| XmlError::Xml(err.to_string()))?;
                push_text(&mut stack, &text);
            }
            Ok(Event::CData(c)) => {
                let raw = c.into_inner();
                push_text(&mut stack, String::from_utf8_lossy(&raw).trim());
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(XmlError::Xml(err.to_string())),
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Invalid(format!(
            "element <{}> is not closed",
            open.name
        )));
    }
    let root = root.ok_or_else(|| XmlError::Invalid("document has no root element".into()))?;
    debug!(root = %root.name, children = root.children.len(), "parsed xml tree");
    Ok(root)
}

fn open_element(event: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(event.local_name().as_ref()).to_string();
    let mut element = Element::new(name);
    for attr in event.attributes() {
        let attr = attr.map_err(|err| XmlError::Xml(err.to_string()))?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Xml(err.to_string()))?;
        element
            .attributes
            .insert(local, value.trim().to_string());
    }
    trace!(element = %element.name, "open element");
    Ok(element)
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if let Some(existing) = root {
        return Err(XmlError::Invalid(format!(
            "second root element <{}> after <{}>",
            element.name, existing.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current.text.push_str(text);
    }
}
