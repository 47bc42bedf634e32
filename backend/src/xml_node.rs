//! Access to repeated XML records.
//!
//! Source documents hold long lists of records (lexicon entries, domain
//! definitions). `for_each_element` walks a document with a streaming reader
//! and hands each record to a callback as a small owned tree, so no tree of
//! the whole document is ever built. Callers that must not act on a document
//! which later turns out to be malformed collect the records first and
//! process them once the whole document has parsed.

use anyhow::{anyhow, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, trimmed, if present and not blank.
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Children reached through a wrapper element, e.g.
    /// `grandchildren("BaseForms", "BaseForm")`.
    pub fn grandchildren<'a>(&'a self, wrapper: &'a str, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children_named(wrapper).flat_map(move |w| w.children_named(name))
    }

    /// Trimmed text of the node, if not blank.
    pub fn trimmed_text(&self) -> Option<&str> {
        Some(self.text.trim()).filter(|t| !t.is_empty())
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.trimmed_text())
    }
}

fn tag_name(e: &BytesStart) -> Result<String> {
    let name = e.name();
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}

fn start_node(e: &BytesStart) -> Result<XmlNode> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.to_string();
        attrs.push((key, value));
    }

    Ok(XmlNode {
        name: tag_name(e)?,
        attrs,
        text: String::new(),
        children: Vec::new(),
    })
}

/// Calls `f` with every `element` subtree in document order.
///
/// Elements named `element` nested inside another matched element are part
/// of the outer subtree and are not reported separately.
pub fn for_each_element<F>(content: &str, element: &str, mut f: F) -> Result<()>
where
    F: FnMut(XmlNode) -> Result<()>,
{
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if !stack.is_empty() || tag_name(e)? == element {
                    stack.push(start_node(e)?);
                }
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(start_node(e)?);
                } else if tag_name(e)? == element {
                    f(start_node(e)?)?;
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&e.unescape()?);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => f(node)?,
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("XML parse error at position {}: {:?}", reader.buffer_position(), e)),
            _ => {}
        }

        buf.clear();
    }

    if !stack.is_empty() {
        return Err(anyhow!("Unexpected end of document inside <{}>", stack[0].name));
    }

    Ok(())
}

/// The document's root element with its attributes, without children.
pub fn read_root(content: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => return start_node(e),
            Ok(Event::Eof) => return Err(anyhow!("Document has no root element")),
            Err(e) => return Err(anyhow!("XML parse error at position {}: {:?}", reader.buffer_position(), e)),
            _ => {}
        }
        buf.clear();
    }
}
