//! Parse command.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{print_id, CommandContext};

/// Parse an id string with a context.
#[derive(Debug, Args)]
pub struct ParseCommand {
    /// Context name.
    context: String,

    /// Id string, e.g. `local=classic=local=web/HelloPortlet`.
    id: String,
}

impl ParseCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let context = ctx.context(&self.context)?;
        let id = context.parse(&self.id)?;
        debug!(context = %self.context, components = id.component_count(), "Parsed id");
        print_id(&id, ctx.format);
        Ok(())
    }
}
