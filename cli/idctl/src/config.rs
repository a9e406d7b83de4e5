//! Grammar configuration.
//!
//! Contexts come from:
//! - The built-in portal contexts (unless disabled)
//! - A grammar file given with `--grammars` / `IDCTL_GRAMMARS`
//! - Otherwise `grammars.toml` in the platform config directory, if present

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use portal_id::ContextRegistry;
use tracing::debug;

/// Grammar file name in the config directory.
const GRAMMAR_FILE: &str = "grammars.toml";

/// Get the default grammar file path.
fn default_grammar_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "portal", "idctl").map(|dirs| dirs.config_dir().join(GRAMMAR_FILE))
}

/// Where contexts are loaded from.
#[derive(Debug, Clone)]
pub struct Config {
    /// Grammar file to load, if any.
    pub grammar_path: Option<PathBuf>,

    /// Include the built-in portal contexts.
    pub builtin: bool,
}

impl Config {
    /// Resolve configuration from an explicit grammar path or the default location.
    ///
    /// An explicit path must exist; the default one is optional.
    pub fn resolve(explicit: Option<PathBuf>, builtin: bool) -> Self {
        let grammar_path = explicit.or_else(|| default_grammar_path().filter(|path| path.exists()));
        Self {
            grammar_path,
            builtin,
        }
    }

    /// Build the context registry described by this configuration.
    pub fn load_registry(&self) -> Result<ContextRegistry> {
        let mut registry = if self.builtin {
            ContextRegistry::builtin().context("Failed to build built-in contexts")?
        } else {
            ContextRegistry::new()
        };

        if let Some(path) = &self.grammar_path {
            load_into(&mut registry, path)?;
        }

        debug!(contexts = registry.len(), "Registry ready");
        Ok(registry)
    }
}

fn load_into(registry: &mut ContextRegistry, path: &Path) -> Result<()> {
    registry
        .load_file(path)
        .with_context(|| format!("Failed to load grammars from {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WINDOW_GRAMMAR: &str = r#"
[[context]]
name = "window"

[[context.component]]
name = "window"
required = true
"#;

    #[test]
    fn test_explicit_grammar_extends_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WINDOW_GRAMMAR.as_bytes()).unwrap();

        let config = Config::resolve(Some(file.path().to_path_buf()), true);
        let registry = config.load_registry().unwrap();
        assert!(registry.get("window").is_some());
        assert!(registry.get("portlet").is_some());
    }

    #[test]
    fn test_without_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WINDOW_GRAMMAR.as_bytes()).unwrap();

        let config = Config::resolve(Some(file.path().to_path_buf()), false);
        let registry = config.load_registry().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_explicit_grammar_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(Some(dir.path().join("missing.toml")), true);
        assert!(config.load_registry().is_err());
    }
}
