//! Named collection of contexts, assembled at startup.
//!
//! A registry is populated once (from the built-in contexts and/or grammar
//! files) and then only read. It is an ordinary value passed to whatever
//! needs it.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::definition::GrammarFile;
use crate::{contexts, Context, IdError};

/// Errors raised while assembling or querying a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The grammar file could not be read.
    #[error("failed to read grammar file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The grammar file is not valid TOML for a grammar.
    #[error("invalid grammar file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A context definition was rejected.
    #[error(transparent)]
    Definition(#[from] IdError),

    /// Two contexts share a name.
    #[error("context '{0}' is already registered")]
    Duplicate(String),

    /// Lookup of a name that is not registered.
    #[error("unknown context '{name}', known contexts: {known}")]
    UnknownContext { name: String, known: String },
}

impl RegistryError {
    /// Returns true if this error indicates an unknown context name.
    pub fn is_unknown_context(&self) -> bool {
        matches!(self, RegistryError::UnknownContext { .. })
    }
}

/// Contexts keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ContextRegistry {
    contexts: BTreeMap<String, Arc<Context>>,
}

impl ContextRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in portal contexts.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for context in contexts::builtin()? {
            registry.register(context)?;
        }
        Ok(registry)
    }

    /// Adds a context. Names must be unique.
    pub fn register(&mut self, context: Arc<Context>) -> Result<(), RegistryError> {
        let name = context.name().to_string();
        if self.contexts.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!(context = %name, grammar = %context.describe(), "Context registered");
        self.contexts.insert(name, context);
        Ok(())
    }

    /// Builds and adds every context of a grammar file given as TOML text.
    ///
    /// The file is applied as a whole: on any error the registry is left
    /// unchanged.
    pub fn extend_from_toml(
        &mut self,
        text: &str,
        origin: &Path,
    ) -> Result<usize, RegistryError> {
        let file = GrammarFile::from_toml(text).map_err(|source| RegistryError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        // Nothing is registered unless every context in the file is valid.
        let mut built = Vec::with_capacity(file.contexts.len());
        let mut names = HashSet::new();
        for definition in &file.contexts {
            let context = definition.build()?;
            let name = context.name().to_string();
            if self.contexts.contains_key(&name) || !names.insert(name.clone()) {
                return Err(RegistryError::Duplicate(name));
            }
            built.push(context);
        }

        let count = built.len();
        for context in built {
            self.register(context)?;
        }
        Ok(count)
    }

    /// Builds and adds every context of a grammar file on disk.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, RegistryError> {
        let text = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.extend_from_toml(&text, path)?;
        info!(path = %path.display(), contexts = count, "Grammar file loaded");
        Ok(count)
    }

    /// Looks up a context by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Context>> {
        self.contexts.get(name)
    }

    /// Looks up a context by name, failing with the list of known names.
    pub fn require(&self, name: &str) -> Result<&Arc<Context>, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::UnknownContext {
            name: name.to_string(),
            known: self.names().collect::<Vec<_>>().join(", "),
        })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    /// Registered contexts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Context>> {
        self.contexts.values()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GRAMMAR: &str = r#"
[[context]]
name = "wsrp"
separator = "::"

[[context.component]]
name = "producer"
required = true

[[context.component]]
name = "handle"
required = true
pattern = "[0-9]+"
"#;

    #[test]
    fn test_builtin_registry() {
        let registry = ContextRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 6);
        assert!(registry.get("portlet").is_some());
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["group", "navigation", "page", "portlet", "site", "user"]
        );
    }

    #[test]
    fn test_unknown_context() {
        let registry = ContextRegistry::builtin().unwrap();
        let err = registry.require("wsrp").unwrap_err();
        assert!(err.is_unknown_context());
        assert!(err.to_string().contains("portlet"));
    }

    #[test]
    fn test_duplicate_context_rejected() {
        let mut registry = ContextRegistry::builtin().unwrap();
        let err = registry
            .register(contexts::portlet().unwrap())
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "portlet"));
    }

    #[test]
    fn test_load_grammar_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GRAMMAR.as_bytes()).unwrap();

        let mut registry = ContextRegistry::new();
        assert_eq!(registry.load_file(file.path()).unwrap(), 1);

        let wsrp = registry.require("wsrp").unwrap();
        let id = wsrp.parse("producer::42").unwrap();
        assert_eq!(id.component("handle").unwrap(), Some("42"));
        assert!(wsrp.parse("producer::abc").is_err());
    }

    #[test]
    fn test_missing_grammar_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ContextRegistry::new();
        let err = registry.load_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn test_invalid_definition_in_grammar_file() {
        let text = "[[context]]\nname = \"broken\"\n";
        let mut registry = ContextRegistry::new();
        let err = registry
            .extend_from_toml(text, Path::new("inline.toml"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Definition(_)));
    }

    #[test]
    fn test_invalid_grammar_file_registers_nothing() {
        let text = format!("{GRAMMAR}\n[[context]]\nname = \"broken\"\n");
        let mut registry = ContextRegistry::builtin().unwrap();
        let err = registry
            .extend_from_toml(&text, Path::new("inline.toml"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Definition(_)));
        assert!(registry.get("wsrp").is_none());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_duplicate_within_grammar_file_registers_nothing() {
        let text = format!("{GRAMMAR}\n{GRAMMAR}");
        let mut registry = ContextRegistry::new();
        let err = registry
            .extend_from_toml(&text, Path::new("inline.toml"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "wsrp"));
        assert!(registry.is_empty());
    }
}
