//! Minimal XML element tree
//!
//! Store results, EAD records and every transform stage output pass through
//! this tree. Parsing uses `quick-xml`; serialization is hand-written so the
//! output is byte-stable: attribute order is preserved, escaping is fixed and
//! nothing time- or environment-dependent is emitted.

use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{CoreError, Result};

/// A child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name as written (e.g. `archdesc`, `fo:block`)
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Builder: append a text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Append a child element
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append a text node (empty strings are ignored)
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Look up an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Name without namespace prefix
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// True if the element has the given qualified or local name
    pub fn is(&self, name: &str) -> bool {
        self.name == name || (!name.contains(':') && self.local_name() == name)
    }

    /// Child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.is(name))
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(name))
    }

    /// Follow a `/`-separated path of child names
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .filter(|step| !step.is_empty())
            .try_fold(self, |current, step| current.child(step))
    }

    /// All elements reachable by a `/`-separated path of child names
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let mut current = vec![self];
        for step in path.split('/').filter(|step| !step.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|e| e.elements().filter(move |c| c.is(step)))
                .collect();
        }
        current
    }

    /// All descendant elements with the given name, in document order
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in self.elements() {
            if child.is(name) {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// Concatenated descendant text
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Descendant text with whitespace runs collapsed and trimmed
    pub fn normalized_text(&self) -> String {
        self.text().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalized text of the element at `path`, `None` when absent or blank
    pub fn find_text(&self, path: &str) -> Option<String> {
        self.find(path)
            .map(Element::normalized_text)
            .filter(|t| !t.is_empty())
    }

    /// Parse a document and return its root element
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(start_element(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = start_element(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| CoreError::Xml("unexpected end tag".to_string()))?;
                    drop_layout_whitespace(&mut element);
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| xml_error(&reader, &err.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(text.into_owned());
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(String::from_utf8_lossy(&e.into_inner()).into_owned());
                    }
                }
                Ok(Event::Eof) => break,
                Err(err) => return Err(xml_error(&reader, &err.to_string())),
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CoreError::Xml(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| CoreError::Xml("document has no root element".to_string()))
    }

    /// Serialize to XML text (no declaration)
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(&escape_text(t)),
                Node::Element(e) => e.write_into(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr.map_err(|err| CoreError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| CoreError::Xml(err.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(CoreError::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

/// Whitespace between child elements is layout, not content, unless the
/// element also carries real text (mixed content).
fn drop_layout_whitespace(element: &mut Element) {
    let mixed = element
        .children
        .iter()
        .any(|node| matches!(node, Node::Text(t) if !t.trim().is_empty()));
    if !mixed {
        element.children.retain(|node| !matches!(node, Node::Text(_)));
    }
}

fn xml_error<R>(reader: &Reader<R>, message: &str) -> CoreError {
    CoreError::Xml(format!("{} at byte {}", message, reader.buffer_position()))
}

/// Escape character data
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

/// Escape an attribute value (double-quoted)
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\t' => out.push_str("&#9;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

/// Characters allowed in XML 1.0 documents
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || !c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let root = Element::parse(
            r#"<ead id="abbey244"><archdesc><did><unittitle>Abbey Theatre collection</unittitle></did></archdesc></ead>"#,
        )
        .unwrap();
        assert_eq!(root.name, "ead");
        assert_eq!(root.attr("id"), Some("abbey244"));
        assert_eq!(
            root.find_text("archdesc/did/unittitle").as_deref(),
            Some("Abbey Theatre collection")
        );
    }

    #[test]
    fn test_layout_whitespace_dropped_mixed_kept() {
        let root = Element::parse(
            "<p>\n  <list>\n    <item>a</item>\n  </list>\n</p>",
        )
        .unwrap();
        let list = root.child("list").unwrap();
        assert_eq!(list.children.len(), 1);

        let mixed = Element::parse("<p>one <emph>two</emph> <emph>three</emph></p>").unwrap();
        assert_eq!(mixed.text(), "one two three");
    }

    #[test]
    fn test_entities_round_trip() {
        let root = Element::parse(r#"<t a="x &amp; &quot;y&quot;">Tom &amp; Jerry &lt;3</t>"#).unwrap();
        assert_eq!(root.attr("a"), Some("x & \"y\""));
        assert_eq!(root.text(), "Tom & Jerry <3");
        assert_eq!(
            root.to_xml(),
            r#"<t a="x &amp; &quot;y&quot;">Tom &amp; Jerry &lt;3</t>"#
        );
    }

    #[test]
    fn test_declaration_and_comments_ignored() {
        let root =
            Element::parse("<?xml version=\"1.0\"?>\n<!-- note -->\n<root><a/></root>").unwrap();
        assert_eq!(root.name, "root");
        assert!(root.child("a").is_some());
    }

    #[test]
    fn test_malformed_input() {
        assert!(Element::parse("<a><b></a>").is_err());
        assert!(Element::parse("<a>").is_err());
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<a/><b/>").is_err());
    }

    #[test]
    fn test_find_all_and_descendants() {
        let root = Element::parse(
            "<dsc><c01><did><unittitle>S1</unittitle></did><c02><did><unittitle>S1.1</unittitle></did></c02></c01><c01><did><unittitle>S2</unittitle></did></c01></dsc>",
        )
        .unwrap();
        assert_eq!(root.find_all("c01/did/unittitle").len(), 2);
        assert_eq!(root.descendants_named("unittitle").len(), 3);
    }

    #[test]
    fn test_find_all_outlives_path() {
        let root = Element::parse("<ead><did><note>a</note><note>b</note></did></ead>").unwrap();
        let found = {
            let path = format!("{}/{}", "did", "note");
            root.find_all(&path)
        };
        let texts: Vec<String> = found.iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_prefixed_names() {
        let root = Element::parse(r#"<fo:root xmlns:fo="urn:fo"><fo:block>x</fo:block></fo:root>"#)
            .unwrap();
        assert!(root.is("root"));
        assert!(root.is("fo:root"));
        assert_eq!(root.child("block").map(|b| b.text()), Some("x".to_string()));
    }

    #[test]
    fn test_control_characters_stripped_on_output() {
        let el = Element::new("t").with_text("bell\u{7}end");
        assert_eq!(el.to_xml(), "<t>bellend</t>");
    }
}
