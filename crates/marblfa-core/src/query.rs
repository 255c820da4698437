//! Structured queries against the finding-aid store
//!
//! [`QueryBuilder`] is the only place untrusted request parameters become a
//! [`Query`]. Inputs are validated into typed values first; every value that
//! reaches the XQuery text goes through [`escape_literal`].
//!
//! # Example
//!
//! ```
//! use marblfa_core::{QueryBuilder, Selection};
//!
//! let builder = QueryBuilder::new("/db/findingaids");
//! let query = builder.build(Some("A"), None)?;
//! assert!(matches!(query.selection(), Selection::Browse { .. }));
//! assert!(query.to_xquery().contains("= 'A'"));
//! # Ok::<(), marblfa_core::ValidationError>(())
//! ```

use std::fmt;

use crate::error::ValidationError;
use crate::terms::split_terms;

/// Sentinel letter value meaning "no filter"
pub const ALL: &str = "all";

/// Letter used when the request does not name one
pub const DEFAULT_LETTER: char = 'A';

/// Longest accepted search term, in characters
pub const MAX_TERM_CHARS: usize = 64;

/// Most search terms accepted in one request
pub const MAX_TERMS: usize = 16;

/// Longest accepted record identifier, in characters
pub const MAX_IDENTIFIER_CHARS: usize = 256;

const ORIGINATION: &str = "$a/archdesc/did/origination";
const CODEPOINT_COLLATION: &str = "http://www.w3.org/2005/xpath-functions/collation/codepoint";

/// A validated single-character letter filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Letter(char);

impl Letter {
    /// Accept exactly one ASCII letter or digit, case preserved
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Ok(Self(c)),
            _ => Err(ValidationError::InvalidLetter(input.to_string())),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Letter filter of a browse query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterFilter {
    All,
    Letter(Letter),
}

impl LetterFilter {
    /// Request parameter form (`all` or the letter)
    pub fn as_param(&self) -> String {
        match self {
            LetterFilter::All => ALL.to_string(),
            LetterFilter::Letter(l) => l.to_string(),
        }
    }
}

/// What a query selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Summary records, optionally narrowed by letter and keyword terms
    Browse {
        letter: LetterFilter,
        terms: Vec<String>,
    },
    /// One full EAD document by identifier
    Lookup { id: String },
}

/// Result ordering requested from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortSpec {
    /// Ascending by record sort key, codepoint comparison
    #[default]
    SortKey,
    /// Store order
    Unsorted,
}

/// An immutable structured query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    selection: Selection,
    source: String,
    sort: SortSpec,
}

impl Query {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Collection path the query runs against
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Render as XQuery text
    ///
    /// Browse queries return `<records>` holding one `<record>` per match;
    /// lookups return `<results>` holding the matching `<ead>`, if any.
    pub fn to_xquery(&self) -> String {
        let source = escape_literal(&self.source);
        match &self.selection {
            Selection::Lookup { id } => format!(
                "<results>{{ collection('{}')/ead[@id = '{}'] }}</results>",
                source,
                escape_literal(id)
            ),
            Selection::Browse { letter, terms } => {
                let mut predicates = Vec::new();
                if let LetterFilter::Letter(letter) = letter {
                    let l = escape_literal(&letter.to_string());
                    predicates.push(format!(
                        "(substring(normalize-space($name), 1, 1) = '{l}' or substring(normalize-space(string($a/archdesc/did/unittitle)), 1, 1) = '{l}')"
                    ));
                }
                for term in terms {
                    predicates.push(format!(
                        "contains(lower-case(string($a)), '{}')",
                        escape_literal(&term.to_lowercase())
                    ));
                }
                let where_clause = if predicates.is_empty() {
                    String::new()
                } else {
                    format!("\n  where {}", predicates.join("\n    and "))
                };
                let order_clause = match self.sort {
                    SortSpec::SortKey => {
                        format!("\n  order by $sort collation \"{}\"", CODEPOINT_COLLATION)
                    }
                    SortSpec::Unsorted => String::new(),
                };

                format!(
                    r#"<records>{{
  for $a in collection('{source}')/ead
  let $name := string(({o}/persname, {o}/corpname, {o}/famname)[normalize-space(.) != ''][1])
  let $sort := replace(string-join(($name, string($a/archdesc/did/unittitle)), ' '), '[^\p{{IsBasicLatin}}]', '')
  let $sort := normalize-space(lower-case($sort)){where_clause}{order_clause}
  return <record id="{{$a/@id}}">
    <name>{{{o}/persname}}{{{o}/corpname}}{{{o}/famname}}</name>
    {{$a/archdesc/did/unittitle}}
    {{$a/archdesc/did/physdesc}}
    {{$a/archdesc/did/abstract}}
    <sort-title>{{$sort}}</sort-title>
  </record>
}}</records>"#,
                    source = source,
                    o = ORIGINATION,
                    where_clause = where_clause,
                    order_clause = order_clause,
                )
            }
        }
    }
}

/// Builds queries from raw request parameters
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    source: String,
}

impl QueryBuilder {
    /// Create a builder for the given collection path
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Build a browse query
    ///
    /// `filter_letter` is a single letter or `all`; absent or blank means
    /// [`DEFAULT_LETTER`]. `terms` is free text, normalized into terms.
    pub fn build(
        &self,
        filter_letter: Option<&str>,
        terms: Option<&str>,
    ) -> Result<Query, ValidationError> {
        let letter = parse_letter_filter(filter_letter)?;
        let terms = validate_terms(terms.map(split_terms).unwrap_or_default())?;
        Ok(Query {
            selection: Selection::Browse { letter, terms },
            source: self.source.clone(),
            sort: SortSpec::SortKey,
        })
    }

    /// Build a keyword search over all letters; at least one term required
    pub fn search(&self, terms: &str) -> Result<Query, ValidationError> {
        let query = self.build(Some(ALL), Some(terms))?;
        match query.selection {
            Selection::Browse { ref terms, .. } if terms.is_empty() => {
                Err(ValidationError::EmptySearch)
            }
            _ => Ok(query),
        }
    }

    /// Build a single-record lookup
    pub fn lookup(&self, id: &str) -> Result<Query, ValidationError> {
        let id = id.trim();
        if id.is_empty()
            || id.chars().count() > MAX_IDENTIFIER_CHARS
            || id.chars().any(char::is_control)
        {
            return Err(ValidationError::InvalidIdentifier(id.to_string()));
        }
        Ok(Query {
            selection: Selection::Lookup { id: id.to_string() },
            source: self.source.clone(),
            sort: SortSpec::Unsorted,
        })
    }
}

fn parse_letter_filter(input: Option<&str>) -> Result<LetterFilter, ValidationError> {
    match input.map(str::trim) {
        None | Some("") => Ok(LetterFilter::Letter(Letter(DEFAULT_LETTER))),
        Some(ALL) => Ok(LetterFilter::All),
        Some(other) => Letter::parse(other).map(LetterFilter::Letter),
    }
}

fn validate_terms(terms: Vec<String>) -> Result<Vec<String>, ValidationError> {
    if terms.len() > MAX_TERMS {
        return Err(ValidationError::TooManyTerms {
            count: terms.len(),
            max: MAX_TERMS,
        });
    }
    if let Some(bad) = terms
        .iter()
        .find(|t| t.chars().count() > MAX_TERM_CHARS || t.chars().any(char::is_control))
    {
        return Err(ValidationError::InvalidTerm(bad.clone()));
    }
    Ok(terms)
}

/// Escape a value for use inside a single-quoted XQuery string literal
///
/// `'` is doubled and `&` becomes an entity reference, the two characters
/// with meaning inside a literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('&', "&amp;").replace('\'', "''")
}
