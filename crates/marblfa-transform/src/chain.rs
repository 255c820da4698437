//! Template registry and ordered transform chains
//!
//! A [`TransformChain`] is bound once from an ordered list of
//! [`TransformStage`]s: every template is resolved and every parameter
//! checked before any document is touched. Applying the chain then feeds
//! stage *i*'s output, and only that, to stage *i + 1*.

use std::collections::BTreeMap;
use std::sync::Arc;

use marblfa_core::Document;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::stage::TransformStage;
use crate::template::{Params, Template};
use crate::templates::{FindingAidLayout, ResultsListing, XslFo};

/// Templates available to stages, by name
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<&'static str, Arc<dyn Template>>,
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.names())
            .finish()
    }
}

impl TemplateRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in templates
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ResultsListing);
        registry.register(FindingAidLayout);
        registry.register(XslFo);
        registry
    }

    /// Add a template, replacing any with the same name
    pub fn register<T: Template + 'static>(&mut self, template: T) {
        debug!("registered template: {}", template.name());
        self.templates.insert(template.name(), Arc::new(template));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Template>> {
        self.templates.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.templates.keys().copied().collect()
    }

    /// Bind `stages` into a chain
    pub fn bind(&self, stages: &[TransformStage]) -> Result<TransformChain> {
        TransformChain::bind(self, stages)
    }

    /// Bind `stages` and apply them to `input`
    pub fn apply(&self, input: &Document, stages: &[TransformStage]) -> Result<Document> {
        self.bind(stages)?.apply(input)
    }
}

struct BoundStage {
    template: Arc<dyn Template>,
    params: BTreeMap<String, String>,
}

/// An ordered, validated sequence of template applications
pub struct TransformChain {
    stages: Vec<BoundStage>,
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.template.name()))
            .finish()
    }
}

impl TransformChain {
    /// Resolve templates and check parameters for each stage
    pub fn bind(registry: &TemplateRegistry, stages: &[TransformStage]) -> Result<Self> {
        if stages.is_empty() {
            return Err(TransformError::EmptyChain);
        }

        let mut bound = Vec::with_capacity(stages.len());
        for stage in stages {
            let template = registry
                .get(stage.template())
                .ok_or_else(|| TransformError::StageNotFound(stage.template().to_string()))?;

            let accepted = template.parameters();
            if let Some(unknown) = stage
                .params()
                .keys()
                .find(|name| !accepted.iter().any(|p| *p == name.as_str()))
            {
                return Err(TransformError::UnknownParameter {
                    template: template.name().to_string(),
                    parameter: unknown.clone(),
                });
            }

            bound.push(BoundStage {
                template,
                params: stage.params().clone(),
            });
        }
        Ok(Self { stages: bound })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Template names in application order
    pub fn template_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.template.name()).collect()
    }

    /// Run every stage in order, each on the previous stage's output
    pub fn apply(&self, input: &Document) -> Result<Document> {
        let mut current = input.clone();
        for (index, stage) in self.stages.iter().enumerate() {
            current = self.apply_stage(index + 1, stage, &current)?;
        }
        Ok(current)
    }

    fn apply_stage(&self, number: usize, stage: &BoundStage, input: &Document) -> Result<Document> {
        let name = stage.template.name();
        let root = input.root().map_err(|source| TransformError::MalformedInput {
            stage: number,
            template: name.to_string(),
            source,
        })?;

        let params = Params::new(name, &stage.params);
        let output = Document::from_element(&stage.template.apply(&root, &params)?);
        debug!(
            stage = number,
            template = name,
            input_bytes = input.len(),
            output_bytes = output.len(),
            "applied transform stage"
        );
        Ok(output)
    }
}
