//! Format and validate commands.

use anyhow::Result;
use clap::Args;

use crate::output::{print_success, OutputFormat};

use super::{print_id, CommandContext};

/// Build an id from explicit component values.
///
/// An empty value truncates the id at that position.
#[derive(Debug, Args)]
pub struct FormatCommand {
    /// Context name.
    context: String,

    /// Component values in declared order.
    #[arg(required = true)]
    components: Vec<String>,
}

impl FormatCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let context = ctx.context(&self.context)?;
        let id = context.create(&self.components)?;
        match ctx.format {
            OutputFormat::Table => println!("{}", context.format(&id)?),
            OutputFormat::Json => print_id(&id, ctx.format),
        }
        Ok(())
    }
}

/// Check component values without building an id.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Context name.
    context: String,

    /// Component values in declared order; pass "" for a missing value.
    components: Vec<String>,
}

impl ValidateCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let context = ctx.context(&self.context)?;
        context.validate(&self.components)?;
        print_success(&format!(
            "{} component(s) are valid for context '{}'",
            self.components.len(),
            context.name()
        ));
        Ok(())
    }
}
