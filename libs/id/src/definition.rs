//! Serializable context definitions.
//!
//! These are the plain-data form of a grammar: what the builder accumulates
//! and what grammar files contain.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Context, IdError};

/// Pattern used when a definition does not name one.
pub const ANY_VALUE_PATTERN: &str = ".*";

/// Kind tag used when a definition does not name one.
pub const UNTYPED_KIND: &str = "untyped";

/// One component of a context definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDefinition {
    /// Component name, unique within its context.
    pub name: String,

    /// Kind of resource the component identifies.
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Whether a value must be present.
    #[serde(default)]
    pub required: bool,

    /// Whether the component may repeat at its position.
    #[serde(default)]
    pub hierarchical: bool,

    /// Regular expression that present values must fully match.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_kind() -> String {
    UNTYPED_KIND.to_string()
}

fn default_pattern() -> String {
    ANY_VALUE_PATTERN.to_string()
}

impl ComponentDefinition {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        pattern: impl Into<String>,
        required: bool,
        hierarchical: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            required,
            hierarchical,
            pattern: pattern.into(),
        }
    }
}

/// A complete context grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextDefinition {
    /// Context name, used in error messages and registry lookups.
    pub name: String,

    /// Separator placed between components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Formatted ids start with the separator.
    #[serde(default)]
    pub require_separator_in_first_position: bool,

    /// Stop validating at the first missing optional component.
    #[serde(default)]
    pub ignore_remaining_after_first_missing_optional: bool,

    /// Components in canonical order.
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentDefinition>,
}

impl ContextDefinition {
    /// Builds a context from this definition.
    pub fn build(&self) -> Result<Arc<Context>, IdError> {
        let mut builder = Context::builder().named(&self.name);
        if let Some(separator) = &self.separator {
            builder = builder.with_default_separator(separator);
        }
        if self.require_separator_in_first_position {
            builder = builder.require_separator_in_first_position();
        }
        if self.ignore_remaining_after_first_missing_optional {
            builder = builder.ignore_remaining_after_first_missing_optional();
        }
        builder.with_components(self.components.iter().cloned()).build()
    }
}

/// Top-level layout of a grammar file.
///
/// ```toml
/// [[context]]
/// name = "portlet"
/// separator = "="
///
/// [[context.component]]
/// name = "container"
/// required = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarFile {
    #[serde(default, rename = "context")]
    pub contexts: Vec<ContextDefinition>,
}

impl GrammarFile {
    /// Parses a grammar file from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
