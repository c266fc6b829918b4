//! Theme preference commands
//!
//! Usage: markkk theme get | markkk theme set <NAME>

use clap::{Args, Subcommand};
use markkk_core::{ExError, MarkkkError};
use markkk_store::DocumentStore;

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the selected theme (stores the default on first use)
    Get,
    /// Select a theme
    Set {
        /// Theme name, e.g. "light" or "dim"
        name: String,
    },
}

pub async fn execute(store: &DocumentStore, args: ThemeArgs) -> anyhow::Result<()> {
    match args.command {
        ThemeCommand::Get => {
            println!("{}", store.get_theme().await?);
        }
        ThemeCommand::Set { name } => {
            if name.trim().is_empty() {
                return Err(ExError::from(MarkkkError::InvalidInput {
                    reason: "theme name must not be empty".to_string(),
                })
                .into());
            }
            store.save_theme(name.trim()).await?;
            println!("{}", name.trim());
        }
    }
    Ok(())
}
