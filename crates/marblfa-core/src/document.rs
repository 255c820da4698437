//! In-memory documents exchanged between pipeline stages

use std::fmt;

use crate::error::Result;
use crate::xml::Element;

/// An XML (or XHTML) document held as text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Serialize an element tree
    pub fn from_element(root: &Element) -> Self {
        Self::new(root.to_xml())
    }

    /// Parse the root element
    pub fn root(&self) -> Result<Element> {
        Element::parse(&self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when the document has no content at all
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Element> for Document {
    fn from(root: Element) -> Self {
        Self::from_element(&root)
    }
}
