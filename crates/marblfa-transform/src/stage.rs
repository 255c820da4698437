//! Transform stages

use std::collections::BTreeMap;

/// A named template plus the parameters for this one application
///
/// Parameters belong to the stage: a later stage sees none of them unless
/// it sets them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformStage {
    template: String,
    params: BTreeMap<String, String>,
}

impl TransformStage {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder: set a parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}
