// Definition parser: a template built once plus the filters it runs with

use std::path::Path;

use super::ast::{Record, Template};
use super::filters::FilterRegistry;
use super::matcher::Matcher;
use crate::error::DefinitionError;

/// Anything that can pull records out of a page body.
///
/// Implementations are shared across worker tasks, so `parse` must not
/// mutate shared state.
pub trait Definition: Send + Sync {
    fn parse(&self, content: &str) -> Vec<Record>;
}

#[derive(Debug)]
pub struct DefinitionParser {
    template: Template,
    filters: FilterRegistry,
}

impl DefinitionParser {
    /// Build a parser with the baseline filters
    pub fn new(source: &str) -> Result<Self, DefinitionError> {
        Self::with_filters(source, FilterRegistry::default())
    }

    pub fn with_filters(source: &str, filters: FilterRegistry) -> Result<Self, DefinitionError> {
        let template = Template::parse(source)?;

        for name in template.filter_names() {
            if !filters.contains(name) {
                tracing::warn!(filter = name, "definition references an unknown filter, values will pass through it unchanged");
            }
        }
        tracing::debug!(
            tokens = template.tokens().len(),
            variables = template.variables().len(),
            "definition template built"
        );

        Ok(Self { template, filters })
    }

    /// Read and build a definition file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let source = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DefinitionError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::new(&source)
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Extract every record the definition finds in `content`. The block is
    /// assumed to repeat, hence the list.
    pub fn parse(&self, content: &str) -> Vec<Record> {
        Matcher::new(&self.filters).extract(&self.template, content)
    }
}

impl Definition for DefinitionParser {
    fn parse(&self, content: &str) -> Vec<Record> {
        DefinitionParser::parse(self, content)
    }
}
