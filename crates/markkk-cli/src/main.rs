//! Markkk CLI
//!
//! Command-line access to the local document store

use clap::{Parser, Subcommand};
use markkk_core::logging_facility::{init, Profile};
use markkk_store::{DocumentStore, StoreConfig};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "markkk")]
#[command(about = "Markkk - local Markdown document store", long_about = None)]
struct Cli {
    /// Database file (overrides MARKKK_DB_PATH; ":memory:" for a scratch store)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Document operations
    Doc(commands::doc::DocArgs),
    /// Theme preference
    Theme(commands::theme::ThemeArgs),
    /// Print the applied schema version
    Schema,
}

/// Config for an explicit `--db` value
fn store_config(path: PathBuf) -> StoreConfig {
    match path.to_str() {
        Some(raw) => StoreConfig::from_env_value(Some(raw)),
        None => StoreConfig::file(path),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init(Profile::from_format(
        std::env::var("MARKKK_LOG_FORMAT").ok().as_deref(),
    ));

    let cli = Cli::parse();
    let explicit;
    let store = match cli.db {
        Some(path) => {
            explicit = DocumentStore::new(store_config(path));
            &explicit
        }
        None => DocumentStore::global(),
    };

    let result = match cli.command {
        Commands::Doc(args) => commands::doc::execute(store, args).await,
        Commands::Theme(args) => commands::theme::execute(store, args).await,
        Commands::Schema => store
            .schema_version()
            .await
            .map(|version| println!("{}", version))
            .map_err(anyhow::Error::from),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
