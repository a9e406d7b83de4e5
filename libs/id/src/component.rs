//! A single segment of a structured identifier.

use std::sync::Arc;

use regex::Regex;

use crate::definition::ComponentDefinition;
use crate::IdError;

/// One named segment of a context grammar.
///
/// The pattern is compiled once when the owning context is built and
/// must match the whole value.
#[derive(Debug, Clone)]
pub struct Component {
    context: Arc<str>,
    name: String,
    kind: String,
    required: bool,
    hierarchical: bool,
    pattern: Regex,
    pattern_source: String,
}

impl Component {
    pub(crate) fn compile(
        context: Arc<str>,
        definition: &ComponentDefinition,
    ) -> Result<Self, IdError> {
        let anchored = format!("^(?:{})$", definition.pattern);
        let pattern = Regex::new(&anchored).map_err(|e| IdError::InvalidDefinition {
            context: context.to_string(),
            message: format!(
                "component '{}' has an invalid pattern '{}': {e}",
                definition.name, definition.pattern
            ),
        })?;

        Ok(Self {
            context,
            name: definition.name.clone(),
            kind: definition.kind.clone(),
            required: definition.required,
            hierarchical: definition.hierarchical,
            pattern,
            pattern_source: definition.pattern.clone(),
        })
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of resource this component identifies.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    /// The pattern as it was declared, without anchors.
    pub fn pattern(&self) -> &str {
        &self.pattern_source
    }

    /// Checks a single value against this component.
    ///
    /// An empty value is a missing value: it fails on a required component
    /// and is accepted on an optional one.
    pub fn validate(&self, value: &str) -> Result<(), IdError> {
        if value.is_empty() {
            if self.required {
                return Err(self.error("required component is missing".to_string()));
            }
            return Ok(());
        }

        if !self.pattern.is_match(value) {
            return Err(self.error(format!(
                "value '{value}' does not match pattern '{}'",
                self.pattern_source
            )));
        }

        Ok(())
    }

    pub(crate) fn error(&self, message: String) -> IdError {
        IdError::InvalidComponent {
            context: self.context.to_string(),
            component: self.name.clone(),
            message,
        }
    }

    pub(crate) fn definition(&self) -> ComponentDefinition {
        ComponentDefinition::new(
            self.name.clone(),
            self.kind.clone(),
            self.pattern_source.clone(),
            self.required,
            self.hierarchical,
        )
    }
}
