//! Error display for the CLI.

use colored::Colorize;
use portal_id::{IdError, RegistryError};

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    if let Some(id_err) = err.downcast_ref::<IdError>() {
        if id_err.errors().count() > 1 {
            eprintln!();
            for failure in id_err.errors() {
                eprintln!("  - {failure}");
            }
        }
        let hint = match id_err {
            IdError::InvalidDefinition { .. } => {
                "Hint: Check the context definition in your grammar file."
            }
            _ => "Hint: Run `idctl contexts <name>` to see the grammar of a context.",
        };
        eprintln!("\n{}", hint.yellow());
        return;
    }

    if let Some(registry_err) = err.downcast_ref::<RegistryError>() {
        match registry_err {
            RegistryError::UnknownContext { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Run `idctl contexts` to list the registered contexts.".yellow()
                );
            }
            RegistryError::Io { .. } | RegistryError::Parse { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Pass --grammars or set IDCTL_GRAMMARS to a valid grammar file."
                        .yellow()
                );
            }
            _ => {}
        }
    }
}
