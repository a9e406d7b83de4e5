//! Child and parent derivation commands.

use anyhow::Result;
use clap::Args;

use crate::output::print_info;

use super::{print_id, CommandContext};

/// Append one component to an id.
#[derive(Debug, Args)]
pub struct ChildCommand {
    /// Context name.
    context: String,

    /// Parent id string.
    id: String,

    /// Value of the new trailing component.
    value: String,
}

impl ChildCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let context = ctx.context(&self.context)?;
        let child = context.parse(&self.id)?.child(&self.value)?;
        print_id(&child, ctx.format);
        Ok(())
    }
}

/// Drop the last component of an id.
#[derive(Debug, Args)]
pub struct ParentCommand {
    /// Context name.
    context: String,

    /// Id string.
    id: String,
}

impl ParentCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let context = ctx.context(&self.context)?;
        let id = context.parse(&self.id)?;
        match id.parent()? {
            Some(parent) => print_id(&parent, ctx.format),
            None => print_info(&format!("'{id}' is a root id and has no parent")),
        }
        Ok(())
    }
}
