//! Precomputed browse letter index
//!
//! The index is a static file (`browse-ndx.xml`) generated outside this
//! system; it is loaded as-is and never recomputed here.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::xml::Element;

/// Distinct leading letters offered by the browse UI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LetterIndex {
    letters: Vec<String>,
}

impl LetterIndex {
    /// Build from letters in display order; duplicates and blanks dropped
    pub fn new<I, S>(letters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for letter in letters {
            let letter: String = letter.into().trim().to_string();
            if !letter.is_empty() && !index.letters.contains(&letter) {
                index.letters.push(letter);
            }
        }
        index
    }

    /// Parse `<alpha_list><letter>A</letter>...</alpha_list>`
    pub fn parse(xml: &str) -> Result<Self> {
        let root = Element::parse(xml)?;
        let letters = root
            .descendants_named("letter")
            .into_iter()
            .map(Element::normalized_text);
        Ok(Self::new(letters))
    }

    /// Load from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let xml = fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    pub fn letters(&self) -> &[String] {
        &self.letters
    }

    pub fn contains(&self, letter: &str) -> bool {
        self.letters.iter().any(|l| l == letter)
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Element form embedded in browse result documents
    pub fn to_element(&self) -> Element {
        let mut list = Element::new("alpha_list");
        for letter in &self.letters {
            list.push(Element::new("letter").with_text(letter));
        }
        list
    }
}
