//! Finding-aid records
//!
//! A [`Record`] is the summary of one archival collection as it appears in a
//! browse listing. Records are read-only: they are parsed from store results
//! (`<record>` elements) or full EAD documents (`<ead>`), never modified.

use crate::error::{CoreError, Result};
use crate::query::Letter;
use crate::xml::Element;

/// Path from an `<ead>` root to the descriptive identification block
pub const DID_PATH: &str = "archdesc/did";

/// Kind of origination name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginationKind {
    Person,
    Corporate,
    Family,
}

impl OriginationKind {
    /// Lookup order when several origination names are present
    pub const PRIORITY: [OriginationKind; 3] = [
        OriginationKind::Person,
        OriginationKind::Corporate,
        OriginationKind::Family,
    ];

    /// EAD element name
    pub fn element_name(self) -> &'static str {
        match self {
            OriginationKind::Person => "persname",
            OriginationKind::Corporate => "corpname",
            OriginationKind::Family => "famname",
        }
    }

    /// Human-readable label for layouts
    pub fn label(self) -> &'static str {
        match self {
            OriginationKind::Person => "Creator",
            OriginationKind::Corporate => "Corporate Creator",
            OriginationKind::Family => "Family",
        }
    }
}

/// The creator of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origination {
    pub kind: OriginationKind,
    pub name: String,
}

/// Summary of one archival collection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub id: String,
    pub origination: Option<Origination>,
    pub title: Option<String>,
    pub physdesc: Option<String>,
    pub abstract_text: Option<String>,
}

impl Record {
    /// Create a record with only an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: set the origination name
    pub fn with_origination(mut self, kind: OriginationKind, name: impl Into<String>) -> Self {
        self.origination = Some(Origination {
            kind,
            name: name.into(),
        });
        self
    }

    /// Builder: set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set the physical description
    pub fn with_physdesc(mut self, physdesc: impl Into<String>) -> Self {
        self.physdesc = Some(physdesc.into());
        self
    }

    /// Builder: set the abstract
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Build a record from a full `<ead>` document
    ///
    /// The identifier is the `id` attribute, falling back to
    /// `eadheader/eadid`.
    pub fn from_ead(ead: &Element) -> Result<Self> {
        let id = ead
            .attr("id")
            .map(str::to_string)
            .filter(|id| !id.trim().is_empty())
            .or_else(|| ead.find_text("eadheader/eadid"))
            .ok_or_else(|| CoreError::Missing("ead identifier".to_string()))?;

        let did = ead.find(DID_PATH);
        let origination = did
            .and_then(|did| did.child("origination"))
            .and_then(first_origination);

        Ok(Self {
            id,
            origination,
            title: did.and_then(|d| d.find_text("unittitle")),
            physdesc: did.and_then(|d| d.find_text("physdesc")),
            abstract_text: did.and_then(|d| d.find_text("abstract")),
        })
    }

    /// Build a record from a store result `<record>` element
    pub fn from_result(record: &Element) -> Result<Self> {
        let id = record
            .attr("id")
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CoreError::Missing("record id attribute".to_string()))?;

        Ok(Self {
            id: id.to_string(),
            origination: record.child("name").and_then(first_origination),
            title: record.find_text("unittitle"),
            physdesc: record.find_text("physdesc"),
            abstract_text: record.find_text("abstract"),
        })
    }

    /// Serialize as a store result `<record>` element
    pub fn to_result_element(&self) -> Element {
        let mut name = Element::new("name");
        if let Some(ref origination) = self.origination {
            name.push(Element::new(origination.kind.element_name()).with_text(&origination.name));
        }

        let mut record = Element::new("record").with_attr("id", &self.id).with_child(name);
        for (tag, value) in [
            ("unittitle", &self.title),
            ("physdesc", &self.physdesc),
            ("abstract", &self.abstract_text),
        ] {
            if let Some(value) = value {
                record.push(Element::new(tag).with_text(value));
            }
        }
        record.push(Element::new("sort-title").with_text(self.sort_key()));
        record
    }

    /// Label shown in listings: origination name, else title
    pub fn list_title(&self) -> &str {
        self.origination
            .as_ref()
            .map(|o| o.name.as_str())
            .or(self.title.as_deref())
            .unwrap_or(&self.id)
    }

    /// First character of the list title
    pub fn first_letter(&self) -> Option<char> {
        self.list_title().chars().next()
    }

    /// Ordering key: origination name then title, lowercased ASCII
    ///
    /// Whitespace runs collapse to one space and non-ASCII characters are
    /// dropped, so keys compare bytewise.
    pub fn sort_key(&self) -> String {
        let parts: Vec<&str> = self
            .origination
            .as_ref()
            .map(|o| o.name.as_str())
            .into_iter()
            .chain(self.title.as_deref())
            .collect();
        sort_key_of(&parts.join(" "))
    }

    /// True if the origination name or title begins with `letter`
    ///
    /// Byte-exact: `a` does not match `Adams`.
    pub fn starts_with_letter(&self, letter: Letter) -> bool {
        let c = letter.as_char();
        self.origination
            .as_ref()
            .is_some_and(|o| o.name.starts_with(c))
            || self.title.as_deref().is_some_and(|t| t.starts_with(c))
    }
}

/// Compute a sort key from raw text
///
/// Non-ASCII characters are dropped first, then ASCII is lowercased and
/// whitespace runs collapse. A word made only of non-ASCII characters leaves
/// no gap.
pub fn sort_key_of(raw: &str) -> String {
    let ascii: String = raw
        .chars()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    ascii.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// First populated origination name, in priority order
fn first_origination(container: &Element) -> Option<Origination> {
    OriginationKind::PRIORITY.iter().find_map(|kind| {
        container
            .children_named(kind.element_name())
            .map(Element::normalized_text)
            .find(|name| !name.is_empty())
            .map(|name| Origination { kind: *kind, name })
    })
}
