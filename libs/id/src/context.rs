//! Context grammars: ordered components plus the rules for validating,
//! parsing and formatting the ids built from them.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::component::Component;
use crate::definition::{ComponentDefinition, ContextDefinition};
use crate::id::{Id, Untyped};
use crate::IdError;

/// The grammar of one family of composite identifiers.
///
/// A context is built once and shared behind an [`Arc`]; every [`Id`] it
/// produces keeps a reference back to it.
#[derive(Debug)]
pub struct Context {
    name: Arc<str>,
    separator: Option<String>,
    components: Vec<Component>,
    required_cardinality: usize,
    has_hierarchical_components: bool,
    requires_separator_in_first_position: bool,
    ignore_remaining_after_first_missing_optional: bool,
    component_names: String,
    required_component_names: String,
}

impl Context {
    /// Starts a new grammar definition.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Separator placed between components, if the context has more than one.
    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// Declared components in canonical order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of required components.
    pub fn required_cardinality(&self) -> usize {
        self.required_cardinality
    }

    pub fn has_hierarchical_components(&self) -> bool {
        self.has_hierarchical_components
    }

    pub fn requires_separator_in_first_position(&self) -> bool {
        self.requires_separator_in_first_position
    }

    pub fn ignores_remaining_after_first_missing_optional(&self) -> bool {
        self.ignore_remaining_after_first_missing_optional
    }

    /// Comma separated list of all component names.
    pub fn component_names(&self) -> &str {
        &self.component_names
    }

    /// Comma separated list of required component names.
    pub fn required_component_names(&self) -> &str {
        &self.required_component_names
    }

    /// Looks up a declared component by name.
    pub fn component(&self, name: &str) -> Result<&Component, IdError> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| IdError::UnknownComponent {
                context: self.name.to_string(),
                component: name.to_string(),
                known: self.component_names.clone(),
            })
    }

    /// One-line summary of the grammar, e.g. `group: /group...`.
    ///
    /// Optional components are bracketed and hierarchical ones end in `...`.
    pub fn describe(&self) -> String {
        let separator = self.separator.as_deref().unwrap_or("");
        let parts: Vec<String> = self
            .components
            .iter()
            .map(|c| {
                let name = if c.is_hierarchical() {
                    format!("{}...", c.name())
                } else {
                    c.name().to_string()
                };
                if c.is_required() {
                    name
                } else {
                    format!("[{name}]")
                }
            })
            .collect();

        let mut grammar = parts.join(separator);
        if self.requires_separator_in_first_position {
            grammar.insert_str(0, separator);
        }
        format!("{}: {grammar}", self.name)
    }

    /// Returns the plain-data definition this context was built from.
    pub fn definition(&self) -> ContextDefinition {
        ContextDefinition {
            name: self.name.to_string(),
            separator: self.separator.clone(),
            require_separator_in_first_position: self.requires_separator_in_first_position,
            ignore_remaining_after_first_missing_optional: self
                .ignore_remaining_after_first_missing_optional,
            components: self.components.iter().map(Component::definition).collect(),
        }
    }

    /// Validates candidate component values against this grammar.
    ///
    /// Empty strings stand for missing values. All failures found in one
    /// pass are reported together.
    pub fn validate<S: AsRef<str>>(&self, values: &[S]) -> Result<(), IdError> {
        self.resolve(values).map(|_| ())
    }

    /// Validates `values` and returns, for each value, the index of the
    /// component it was matched against.
    ///
    /// With a hierarchical component the mapping is not positional: extra
    /// values absorbed by the hierarchical component map to it. The
    /// resolution is greedy with a single step of look-back. It never
    /// revisits earlier decisions, so ambiguous grammars can be resolved
    /// differently than a full parser would.
    pub(crate) fn resolve<S: AsRef<str>>(
        &self,
        values: &[S],
    ) -> Result<Vec<Option<usize>>, IdError> {
        self.check_cardinality(values.len())?;

        let declared = self.components.len();
        let padded: Vec<&str> = (0..declared.max(values.len()))
            .map(|i| values.get(i).map_or("", |value| value.as_ref()))
            .collect();

        let mut resolved = vec![None; values.len()];
        let mut errors = Vec::new();

        if self.has_hierarchical_components {
            self.resolve_hierarchical(&padded, &mut resolved, &mut errors);
        } else {
            for (index, component) in self.components.iter().enumerate() {
                let value = padded[index];
                if self.stops_at(component, value) {
                    break;
                }
                match component.validate(value) {
                    Ok(()) => {
                        if let Some(slot) = resolved.get_mut(index) {
                            *slot = Some(index);
                        }
                    }
                    Err(err) => errors.push(err),
                }
            }
        }

        IdError::merge(errors)?;
        Ok(resolved)
    }

    fn resolve_hierarchical(
        &self,
        padded: &[&str],
        resolved: &mut [Option<usize>],
        errors: &mut Vec<IdError>,
    ) {
        let last = self.components.len() - 1;
        let mut cursor = 0;

        for (index, value) in padded.iter().copied().enumerate() {
            if cursor > last {
                cursor = last;
            }
            let component = &self.components[cursor];
            if self.stops_at(component, value) {
                break;
            }

            let matched = match component.validate(value) {
                Ok(()) => Some(cursor),
                Err(err) => {
                    // Look-back only applies past the second position.
                    let previous = (cursor > 1)
                        .then(|| &self.components[cursor - 1])
                        .filter(|c| c.is_hierarchical());
                    if let Some(previous) = previous {
                        match previous.validate(value) {
                            Ok(()) => {
                                trace!(
                                    context = %self.name,
                                    component = previous.name(),
                                    value,
                                    "hierarchical component absorbed value"
                                );
                                cursor -= 1;
                                Some(cursor)
                            }
                            Err(_) => {
                                errors.push(err);
                                None
                            }
                        }
                    } else {
                        errors.push(err);
                        None
                    }
                }
            };

            if let (Some(component_index), Some(slot)) = (matched, resolved.get_mut(index)) {
                *slot = Some(component_index);
            }
            cursor += 1;
        }
    }

    /// Index of the component that a value appended at `position` is
    /// checked against.
    ///
    /// Past the last component, a hierarchical context keeps using its last
    /// component; any other context is already full.
    pub(crate) fn position_of_next(&self, position: usize) -> Result<usize, IdError> {
        let declared = self.components.len();
        if position < declared {
            return Ok(position);
        }
        if self.has_hierarchical_components {
            return Ok(declared - 1);
        }
        Err(IdError::Cardinality {
            context: self.name.to_string(),
            message: format!(
                "expected at most {declared} components ({}), got {}",
                self.component_names,
                position + 1
            ),
        })
    }

    fn stops_at(&self, component: &Component, value: &str) -> bool {
        self.ignore_remaining_after_first_missing_optional
            && value.is_empty()
            && !component.is_required()
    }

    fn check_cardinality(&self, count: usize) -> Result<(), IdError> {
        if count < self.required_cardinality {
            return Err(IdError::Cardinality {
                context: self.name.to_string(),
                message: format!(
                    "expected at least {} components ({}), got {count}",
                    self.required_cardinality, self.required_component_names
                ),
            });
        }

        if !self.has_hierarchical_components && count > self.components.len() {
            return Err(IdError::Cardinality {
                context: self.name.to_string(),
                message: format!(
                    "expected at most {} components ({}), got {count}",
                    self.components.len(),
                    self.component_names
                ),
            });
        }

        Ok(())
    }

    /// Creates an untyped id from explicit component values.
    ///
    /// The first value is the root component. Any later value that is
    /// empty truncates the id: it and everything after it are dropped.
    pub fn create<S: AsRef<str>>(self: &Arc<Self>, components: &[S]) -> Result<Id, IdError> {
        Id::<Untyped>::create(self, components)
    }

    /// Parses an id string into an untyped id.
    pub fn parse(self: &Arc<Self>, id: &str) -> Result<Id, IdError> {
        let components = self.extract_components(id)?;
        Id::from_components(Arc::clone(self), components)
    }

    /// Splits an id string into its raw component values.
    ///
    /// The separator is never escaped: a separator inside a value always
    /// splits it. Empty tokens are skipped.
    pub fn extract_components(&self, id: &str) -> Result<Vec<String>, IdError> {
        let body = match (&self.separator, self.requires_separator_in_first_position) {
            (Some(separator), true) => id.strip_prefix(separator.as_str()).ok_or_else(|| {
                IdError::InvalidFormat {
                    context: self.name.to_string(),
                    message: format!("'{id}' must start with separator '{separator}'"),
                }
            })?,
            _ => id,
        };

        let components: Vec<String> = match &self.separator {
            Some(separator) => body
                .split(separator.as_str())
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
            None if body.is_empty() => Vec::new(),
            None => vec![body.to_string()],
        };

        if components.is_empty() {
            return Err(IdError::InvalidFormat {
                context: self.name.to_string(),
                message: format!("no components found in '{id}'"),
            });
        }

        Ok(components)
    }

    /// Formats an id with this context's canonical layout.
    ///
    /// The id's components are validated against this context first, so
    /// an id can be formatted through a compatible context other than the
    /// one that produced it.
    pub fn format<T>(&self, id: &Id<T>) -> Result<String, IdError> {
        self.validate(id.components())?;
        Ok(self.join(id.components()))
    }

    pub(crate) fn join<S: AsRef<str>>(&self, components: &[S]) -> String {
        let separator = self.separator.as_deref().unwrap_or("");
        let mut out = String::new();
        for (index, component) in components.iter().enumerate() {
            if index > 0 || self.requires_separator_in_first_position {
                out.push_str(separator);
            }
            out.push_str(component.as_ref());
        }
        out
    }
}

/// Accumulates a context grammar. See [`Context::builder`].
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    name: Option<String>,
    separator: Option<String>,
    components: Vec<ComponentDefinition>,
    require_separator_in_first_position: bool,
    ignore_remaining_after_first_missing_optional: bool,
}

impl ContextBuilder {
    /// Names the context. Required.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_default_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn required_component(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.components
            .push(ComponentDefinition::new(name, kind, pattern, true, false));
        self
    }

    pub fn optional_component(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.components
            .push(ComponentDefinition::new(name, kind, pattern, false, false));
        self
    }

    /// Adds a required component that may repeat any number of times.
    /// Only one is allowed per context.
    pub fn required_unbounded_hierarchical_component(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.components
            .push(ComponentDefinition::new(name, kind, pattern, true, true));
        self
    }

    pub(crate) fn with_components(
        mut self,
        components: impl IntoIterator<Item = ComponentDefinition>,
    ) -> Self {
        self.components.extend(components);
        self
    }

    pub fn ignore_remaining_after_first_missing_optional(mut self) -> Self {
        self.ignore_remaining_after_first_missing_optional = true;
        self
    }

    pub fn require_separator_in_first_position(mut self) -> Self {
        self.require_separator_in_first_position = true;
        self
    }

    /// Checks the definition and compiles every component pattern.
    pub fn build(self) -> Result<Arc<Context>, IdError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(IdError::InvalidDefinition {
                    context: "<unnamed>".to_string(),
                    message: "a context must be named".to_string(),
                })
            }
        };
        let invalid = |message: &str| IdError::InvalidDefinition {
            context: name.clone(),
            message: message.to_string(),
        };

        if self.components.is_empty() {
            return Err(invalid("at least one component is required"));
        }
        if self.separator.as_deref() == Some("") {
            return Err(invalid("the separator cannot be empty"));
        }

        let hierarchical = self.components.iter().filter(|c| c.hierarchical).count();
        if hierarchical > 1 {
            return Err(invalid("only one hierarchical component is supported"));
        }
        if self.components.iter().any(|c| c.hierarchical && !c.required) {
            return Err(invalid("hierarchical components must be required"));
        }
        if self.separator.is_none() {
            if self.components.len() > 1 {
                return Err(invalid(
                    "a separator is required when more than one component is declared",
                ));
            }
            if hierarchical > 0 {
                return Err(invalid(
                    "a separator is required when a hierarchical component is declared",
                ));
            }
            if self.require_separator_in_first_position {
                return Err(invalid(
                    "a separator is required to place it in first position",
                ));
            }
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if component.name.is_empty() {
                return Err(invalid("component names cannot be empty"));
            }
            if !seen.insert(component.name.as_str()) {
                return Err(IdError::InvalidDefinition {
                    context: name.clone(),
                    message: format!("duplicate component name '{}'", component.name),
                });
            }
        }

        let context_name: Arc<str> = Arc::from(name.as_str());
        let components = self
            .components
            .iter()
            .map(|definition| Component::compile(Arc::clone(&context_name), definition))
            .collect::<Result<Vec<_>, _>>()?;

        let required_cardinality = components.iter().filter(|c| c.is_required()).count();
        let component_names = components
            .iter()
            .map(Component::name)
            .collect::<Vec<_>>()
            .join(", ");
        let required_component_names = components
            .iter()
            .filter(|c| c.is_required())
            .map(Component::name)
            .collect::<Vec<_>>()
            .join(", ");

        let context = Context {
            name: context_name,
            separator: self.separator,
            required_cardinality,
            has_hierarchical_components: hierarchical > 0,
            requires_separator_in_first_position: self.require_separator_in_first_position,
            ignore_remaining_after_first_missing_optional: self
                .ignore_remaining_after_first_missing_optional,
            components,
            component_names,
            required_component_names,
        };

        debug!(
            context = %context.name,
            components = context.components.len(),
            required = context.required_cardinality,
            hierarchical = context.has_hierarchical_components,
            "Context built"
        );

        Ok(Arc::new(context))
    }
}
