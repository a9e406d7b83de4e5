//! Immutable identifier values produced by a [`Context`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::{self, DeserializeSeed, Deserializer, Visitor};

use crate::{Context, IdError};

/// A kind of resource an id can identify.
///
/// Implementors are zero-sized tags; see [`define_identifiable!`](crate::define_identifiable).
pub trait Identifiable {
    /// Kind name, unique across the portal's resources.
    const KIND: &'static str;
}

/// Tag for ids whose kind is not tracked statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Untyped;

impl Identifiable for Untyped {
    const KIND: &'static str = crate::definition::UNTYPED_KIND;
}

/// A validated composite identifier.
///
/// Holds at least one component (the root) and the context that produced
/// it. Equality, hashing and ordering only look at the components; the
/// context and the kind tag `T` are ignored.
pub struct Id<T = Untyped> {
    context: Arc<Context>,
    components: Vec<String>,
    resolved: Vec<Option<usize>>,
    kind: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Creates an id from explicit component values.
    ///
    /// The first value is the root. Later values are kept up to the first
    /// empty one; that value and everything after it are discarded.
    pub fn create<S: AsRef<str>>(
        context: &Arc<Context>,
        components: &[S],
    ) -> Result<Self, IdError> {
        let mut values: Vec<String> = Vec::with_capacity(components.len());
        if let Some((root, additional)) = components.split_first() {
            values.push(root.as_ref().to_string());
            values.extend(
                additional
                    .iter()
                    .map(|value| value.as_ref())
                    .take_while(|value: &&str| !value.is_empty())
                    .map(str::to_string),
            );
        }
        Self::from_components(Arc::clone(context), values)
    }

    pub(crate) fn from_components(
        context: Arc<Context>,
        components: Vec<String>,
    ) -> Result<Self, IdError> {
        let resolved = context.resolve(&components)?;

        if components.first().map_or(true, String::is_empty) {
            let root = context
                .components()
                .first()
                .map_or_else(String::new, |c| c.name().to_string());
            return Err(IdError::InvalidComponent {
                context: context.name().to_string(),
                component: root,
                message: "an id needs a root component".to_string(),
            });
        }

        Ok(Self {
            context,
            components,
            resolved,
            kind: PhantomData,
        })
    }

    /// The context that produced this id.
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Component values in order.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn root_component(&self) -> &str {
        &self.components[0]
    }

    pub fn last_component(&self) -> &str {
        &self.components[self.components.len() - 1]
    }

    /// Name of the component the value at `index` was matched against.
    pub fn component_name_at(&self, index: usize) -> Option<&str> {
        let component = self.resolved.get(index).copied().flatten()?;
        Some(self.context.components()[component].name())
    }

    /// Value of the named component.
    ///
    /// Returns the first matching value when a hierarchical component
    /// holds several, `None` when the component is declared but absent, and
    /// an error when the context does not declare it.
    pub fn component(&self, name: &str) -> Result<Option<&str>, IdError> {
        Ok(self.component_values(name)?.into_iter().next())
    }

    /// All values matched against the named component, in order.
    pub fn component_values(&self, name: &str) -> Result<Vec<&str>, IdError> {
        self.context.component(name)?;
        Ok(self
            .components
            .iter()
            .enumerate()
            .filter(|(index, _)| self.component_name_at(*index) == Some(name))
            .map(|(_, value)| value.as_str())
            .collect())
    }

    /// Derives the id of a child by appending one component.
    ///
    /// The new value is only checked against the component at position
    /// `component_count`, or the last component once a hierarchical
    /// context runs past its declared components. The parent is left
    /// untouched.
    pub fn child(&self, value: &str) -> Result<Id, IdError> {
        if value.is_empty() {
            return Err(IdError::InvalidFormat {
                context: self.context.name().to_string(),
                message: format!("cannot derive an empty child of '{self}'"),
            });
        }

        let position = self.context.position_of_next(self.components.len())?;
        self.context.components()[position].validate(value)?;

        let mut components = self.components.clone();
        components.push(value.to_string());
        let mut resolved = self.resolved.clone();
        resolved.push(Some(position));

        Ok(Id {
            context: Arc::clone(&self.context),
            components,
            resolved,
            kind: PhantomData,
        })
    }

    /// Derives the parent id by dropping the last component.
    ///
    /// Returns `None` for a root id. Fails when the shortened id no longer
    /// satisfies the context.
    pub fn parent(&self) -> Result<Option<Id>, IdError> {
        match self.components.split_last() {
            Some((_, parent)) if !parent.is_empty() => {
                Id::from_components(Arc::clone(&self.context), parent.to_vec()).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Formats this id through another, compatible context.
    pub fn format_with(&self, context: &Context) -> Result<String, IdError> {
        context.format(self)
    }

    /// Re-tags this id with another resource kind.
    pub fn retag<U>(self) -> Id<U> {
        Id {
            context: self.context,
            components: self.components,
            resolved: self.resolved,
            kind: PhantomData,
        }
    }
}

impl<T: Identifiable> Id<T> {
    /// Kind name of the tag this id carries.
    pub fn kind(&self) -> &'static str {
        T::KIND
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            components: self.components.clone(),
            resolved: self.resolved.clone(),
            kind: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Id")
            .field("context", &self.context.name())
            .field("components", &self.components)
            .finish()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.context.join(&self.components))
    }
}

impl<T, U> PartialEq<Id<U>> for Id<T> {
    fn eq(&self, other: &Id<U>) -> bool {
        self.components == other.components
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string()
            .cmp(&other.to_string())
            .then_with(|| self.components.cmp(&other.components))
    }
}

impl<T> serde::Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Deserializes an id string by parsing it with a given context.
///
/// ```ignore
/// let mut de = serde_json::Deserializer::from_str("\"a=b\"");
/// let id: Id<Portlet> = IdSeed::new(&context).deserialize(&mut de)?;
/// ```
pub struct IdSeed<'a, T = Untyped> {
    context: &'a Arc<Context>,
    kind: PhantomData<fn() -> T>,
}

impl<'a, T> IdSeed<'a, T> {
    pub fn new(context: &'a Arc<Context>) -> Self {
        Self {
            context,
            kind: PhantomData,
        }
    }
}

impl<'de, T> DeserializeSeed<'de> for IdSeed<'_, T> {
    type Value = Id<T>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de, T> Visitor<'de> for IdSeed<'_, T> {
    type Value = Id<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an id string for context '{}'", self.context.name())
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.context
            .parse(value)
            .map(Id::retag)
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Portlet;

    fn context() -> Arc<Context> {
        Context::builder()
            .named("portlet")
            .with_default_separator("=")
            .required_component("container", "container", ".*")
            .required_component("portal", "portal", ".*")
            .optional_component("invoker", "invoker", ".*")
            .optional_component("portlet", "portlet", ".*")
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_truncates_at_first_missing_value() {
        let context = context();
        let id = context.create(&["c", "p", "", "portlet"]).unwrap();
        assert_eq!(id.components(), ["c", "p"]);
    }

    #[test]
    fn test_create_without_values_fails() {
        let context = context();
        let err = context.create::<&str>(&[]).unwrap_err();
        assert!(err.is_cardinality_error());
    }

    #[test]
    fn test_component_lookup() {
        let id = context().create(&["c", "p", "i"]).unwrap();
        assert_eq!(id.component("invoker").unwrap(), Some("i"));
        assert_eq!(id.component("portlet").unwrap(), None);
        assert!(id.component("window").is_err());
        assert_eq!(id.component_name_at(1), Some("portal"));
        assert_eq!(id.component_name_at(3), None);
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = context().create(&["c", "p"]).unwrap();
        let child = parent.child("i").unwrap();
        assert_eq!(parent.component_count(), 2);
        assert_eq!(child.to_string(), "c=p=i");
        assert!(parent.child("").is_err());
    }

    #[test]
    fn test_parent_of_root_is_none() {
        let context = Context::builder()
            .named("user")
            .required_component("user", "user", ".*")
            .build()
            .unwrap();
        let id = context.create(&["root"]).unwrap();
        assert!(id.parent().unwrap().is_none());
    }

    #[test]
    fn test_parent_failing_cardinality() {
        let id = context().create(&["c", "p"]).unwrap();
        assert!(id.parent().unwrap_err().is_cardinality_error());
    }

    #[test]
    fn test_equality_ignores_kind_tag() {
        let id = context().create(&["c", "p"]).unwrap();
        let typed: Id<Portlet> = id.clone().retag();
        assert_eq!(typed, id);
        assert_eq!(typed.kind(), "portlet");
        assert_eq!(id.kind(), "untyped");
    }

    #[test]
    fn test_ordering_uses_canonical_string() {
        let context = context();
        let a = context.create(&["a", "b"]).unwrap();
        let b = context.create(&["a", "b", "c"]).unwrap();
        let c = context.create(&["b", "a"]).unwrap();
        let mut ids = vec![c.clone(), b.clone(), a.clone()];
        ids.sort();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_serialize_and_seed() {
        let context = context();
        let id = context.create(&["c", "p", "i"]).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"c=p=i\"");

        let mut de = serde_json::Deserializer::from_str(&json);
        let parsed: Id<Portlet> = IdSeed::new(&context).deserialize(&mut de).unwrap();
        assert_eq!(parsed, id);

        let mut de = serde_json::Deserializer::from_str("\"c\"");
        assert!(IdSeed::<Untyped>::new(&context).deserialize(&mut de).is_err());
    }
}
