//! Template trait and stage parameter access

use std::collections::BTreeMap;

use marblfa_core::Element;

use crate::error::{Result, TransformError};

/// A structural document-to-document rewrite
///
/// Templates are pure: the output depends only on the input tree and the
/// parameters, never on time, environment or earlier calls.
pub trait Template: Send + Sync {
    /// Stable name stages refer to
    fn name(&self) -> &'static str;

    /// Parameters this template accepts
    fn parameters(&self) -> &'static [&'static str];

    /// Rewrite `input` into a new document tree
    fn apply(&self, input: &Element, params: &Params<'_>) -> Result<Element>;
}

/// Read-only view of one stage's parameters
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    template: &'static str,
    values: &'a BTreeMap<String, String>,
}

impl<'a> Params<'a> {
    pub fn new(template: &'static str, values: &'a BTreeMap<String, String>) -> Self {
        Self { template, values }
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value or `default` when absent
    pub fn get_or(&self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Value restricted to `allowed`, or `default` when absent
    pub fn choice(&self, name: &str, allowed: &[&str], default: &'a str) -> Result<&'a str> {
        match self.get(name) {
            None => Ok(default),
            Some(value) if allowed.iter().any(|a| *a == value) => Ok(value),
            Some(value) => Err(self.invalid(name, value, &format!("one of {}", allowed.join(", ")))),
        }
    }

    /// Error for a parameter value the template cannot use
    pub fn invalid(&self, name: &str, value: &str, expected: &str) -> TransformError {
        TransformError::InvalidParameter {
            template: self.template.to_string(),
            parameter: name.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Error for an input document the template cannot handle
pub(crate) fn failed(template: &str, reason: impl Into<String>) -> TransformError {
    TransformError::Failed {
        template: template.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice() {
        let mut values = BTreeMap::new();
        values.insert("mode".to_string(), "full".to_string());
        let params = Params::new("finding-aid", &values);
        assert_eq!(params.choice("mode", &["full", "summary"], "summary").unwrap(), "full");
        assert_eq!(params.choice("other", &["x"], "x").unwrap(), "x");
        assert!(matches!(
            params.choice("mode", &["summary"], "summary"),
            Err(TransformError::InvalidParameter { .. })
        ));
    }
}
