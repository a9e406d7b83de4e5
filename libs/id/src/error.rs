//! Error types for identifier grammars, parsing and validation.

use thiserror::Error;

/// Errors raised while building contexts or creating, parsing and
/// formatting ids.
///
/// Every variant is an invalid-argument failure. The variants only tell
/// callers which rule rejected the input; the message carries the detail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Too few or too many component values for the context.
    #[error("invalid cardinality for context '{context}': {message}")]
    Cardinality { context: String, message: String },

    /// A component value was missing or did not match its pattern.
    #[error("invalid component '{component}' in context '{context}': {message}")]
    InvalidComponent {
        context: String,
        component: String,
        message: String,
    },

    /// A component name that the context does not declare.
    #[error("unknown component '{component}' in context '{context}', expected one of: {known}")]
    UnknownComponent {
        context: String,
        component: String,
        known: String,
    },

    /// An id string that could not be split into components.
    #[error("invalid id format for context '{context}': {message}")]
    InvalidFormat { context: String, message: String },

    /// A context definition rejected by the builder.
    #[error("invalid context definition '{context}': {message}")]
    InvalidDefinition { context: String, message: String },

    /// Several failures collected during one validation attempt.
    #[error("{}", join_messages(.0))]
    Multiple(Vec<IdError>),
}

fn join_messages(errors: &[IdError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl IdError {
    /// Collapses collected failures into a single result.
    pub(crate) fn merge(mut errors: Vec<IdError>) -> Result<(), IdError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(IdError::Multiple(errors)),
        }
    }

    /// Always true: every id failure is an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        true
    }

    /// Returns true if this error (or any merged error) is a cardinality failure.
    pub fn is_cardinality_error(&self) -> bool {
        self.errors().any(|e| matches!(e, IdError::Cardinality { .. }))
    }

    /// Returns true if this error (or any merged error) rejected a component value.
    pub fn is_component_error(&self) -> bool {
        self.errors().any(|e| matches!(e, IdError::InvalidComponent { .. }))
    }

    /// Returns true if this error comes from a context definition.
    pub fn is_definition_error(&self) -> bool {
        matches!(self, IdError::InvalidDefinition { .. })
    }

    /// Iterates over the individual failures, flattening merged errors.
    pub fn errors(&self) -> Box<dyn Iterator<Item = &IdError> + '_> {
        match self {
            IdError::Multiple(errors) => Box::new(errors.iter().flat_map(IdError::errors)),
            other => Box::new(std::iter::once(other)),
        }
    }

    /// Names of the components rejected by this error.
    pub fn rejected_components(&self) -> Vec<&str> {
        self.errors()
            .filter_map(|e| match e {
                IdError::InvalidComponent { component, .. } => Some(component.as_str()),
                _ => None,
            })
            .collect()
    }
}
