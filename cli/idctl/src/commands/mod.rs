//! CLI commands.

mod contexts;
mod derive;
mod format;
mod parse;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use portal_id::{Context, ContextRegistry, Id};
use serde::Serialize;
use tabled::Tabled;

use crate::config::Config;
use crate::logging;
use crate::output::{print_output, print_single, OutputFormat};

/// idctl - Parse, validate and format portal identifiers.
#[derive(Debug, Parser)]
#[command(name = "idctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Grammar file declaring additional contexts.
    #[arg(long, global = true, env = "IDCTL_GRAMMARS")]
    grammars: Option<PathBuf>,

    /// Only use contexts from the grammar file.
    #[arg(long, global = true)]
    no_builtin: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, env = "IDCTL_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse an id string into its components.
    Parse(parse::ParseCommand),

    /// Build an id from component values and print its canonical form.
    Format(format::FormatCommand),

    /// Check component values against a context.
    Validate(format::ValidateCommand),

    /// Derive the id of a child.
    Child(derive::ChildCommand),

    /// Derive the id of the parent.
    Parent(derive::ParentCommand),

    /// List registered contexts or show one grammar.
    Contexts(contexts::ContextsCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        logging::init(&self.log_level, self.log_json);

        if let Commands::Version = self.command {
            println!("idctl {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        let config = Config::resolve(self.grammars, !self.no_builtin);
        let ctx = CommandContext {
            registry: config.load_registry()?,
            format: OutputFormat::from_flag(&self.format),
        };

        match self.command {
            Commands::Parse(cmd) => cmd.run(&ctx),
            Commands::Format(cmd) => cmd.run(&ctx),
            Commands::Validate(cmd) => cmd.run(&ctx),
            Commands::Child(cmd) => cmd.run(&ctx),
            Commands::Parent(cmd) => cmd.run(&ctx),
            Commands::Contexts(cmd) => cmd.run(&ctx),
            Commands::Version => Ok(()),
        }
    }
}

/// Shared state for command execution.
pub struct CommandContext {
    pub registry: ContextRegistry,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Look up a context by name.
    pub fn context(&self, name: &str) -> Result<&Arc<Context>> {
        Ok(self.registry.require(name)?)
    }
}

/// One component of an id, as printed.
#[derive(Debug, Serialize, Tabled)]
struct ComponentRow {
    position: usize,
    component: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct IdView {
    context: String,
    id: String,
    components: Vec<ComponentRow>,
}

impl IdView {
    fn new(id: &Id) -> Self {
        let components = id
            .components()
            .iter()
            .enumerate()
            .map(|(position, value)| ComponentRow {
                position,
                component: id.component_name_at(position).unwrap_or("-").to_string(),
                value: value.clone(),
            })
            .collect();

        Self {
            context: id.context().name().to_string(),
            id: id.to_string(),
            components,
        }
    }
}

/// Print an id with its resolved components.
fn print_id(id: &Id, format: OutputFormat) {
    let view = IdView::new(id);
    match format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => {
            println!("id: {}", view.id);
            print_output(&view.components, format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_view_names_hierarchical_components() {
        let registry = ContextRegistry::builtin().unwrap();
        let navigation = registry.require("navigation").unwrap();
        let id = navigation.parse("/site/classic/home/about").unwrap();

        let view = IdView::new(&id);
        let names: Vec<_> = view.components.iter().map(|c| c.component.as_str()).collect();
        assert_eq!(names, vec!["type", "site", "node", "node"]);
        assert_eq!(view.id, "/site/classic/home/about");
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "idctl", "--format", "json", "parse", "portlet", "local=classic",
        ])
        .unwrap();
        assert_eq!(cli.format, "json");
        assert!(matches!(cli.command, Commands::Parse(_)));
    }
}
