//! Contexts command (registered grammars).

use anyhow::Result;
use clap::Args;
use portal_id::Context;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_single, OutputFormat};

use super::CommandContext;

/// List registered contexts, or show the components of one.
#[derive(Debug, Args)]
pub struct ContextsCommand {
    /// Context to show in detail.
    name: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct ContextRow {
    name: String,
    separator: String,
    required: usize,
    grammar: String,
}

impl ContextRow {
    fn new(context: &Context) -> Self {
        Self {
            name: context.name().to_string(),
            separator: context.separator().unwrap_or("-").to_string(),
            required: context.required_cardinality(),
            grammar: context.describe(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct ComponentRow {
    name: String,
    kind: String,
    required: bool,
    hierarchical: bool,
    pattern: String,
}

impl ContextsCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        match self.name {
            Some(name) => show(ctx, &name),
            None => {
                let rows: Vec<ContextRow> =
                    ctx.registry.iter().map(|c| ContextRow::new(c)).collect();
                print_output(&rows, ctx.format);
                Ok(())
            }
        }
    }
}

fn show(ctx: &CommandContext, name: &str) -> Result<()> {
    let context = ctx.context(name)?;
    match ctx.format {
        OutputFormat::Json => print_single(&context.definition()),
        OutputFormat::Table => {
            println!("{}", context.describe());
            let rows: Vec<ComponentRow> = context
                .components()
                .iter()
                .map(|c| ComponentRow {
                    name: c.name().to_string(),
                    kind: c.kind().to_string(),
                    required: c.is_required(),
                    hierarchical: c.is_hierarchical(),
                    pattern: c.pattern().to_string(),
                })
                .collect();
            print_output(&rows, ctx.format);
        }
    }
    Ok(())
}
