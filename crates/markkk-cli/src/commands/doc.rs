//! Document commands
//!
//! Usage: markkk doc new|list|show|edit|rm

use anyhow::Context;
use clap::{Args, Subcommand};
use markkk_core::model::timestamp;
use markkk_core::{Document, ExError, MarkkkError};
use markkk_store::DocumentStore;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DocArgs {
    #[command(subcommand)]
    pub command: DocCommand,
}

#[derive(Debug, Subcommand)]
pub enum DocCommand {
    /// Save a new document
    New {
        /// Document name (a random `doc-xxxxxx` name is used if omitted)
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        body: BodyArgs,
    },
    /// List documents, most recently touched first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print one document
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Replace a document's content (and optionally its name)
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a document
    Rm { id: String },
}

/// Markdown source given inline or read from a file
#[derive(Debug, Args)]
pub struct BodyArgs {
    /// Markdown content
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub content: Option<String>,

    /// Read the Markdown content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl BodyArgs {
    fn read(self) -> anyhow::Result<String> {
        match (self.content, self.file) {
            (Some(content), _) => Ok(content),
            (None, Some(path)) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {}", path.display())),
            (None, None) => anyhow::bail!("either CONTENT or --file is required"),
        }
    }
}

pub async fn execute(store: &DocumentStore, args: DocArgs) -> anyhow::Result<()> {
    match args.command {
        DocCommand::New { name, body } => {
            let content = body.read()?;
            let doc = store.save_document(content, name.as_deref()).await?;
            println!("{}", doc.id);
        }
        DocCommand::List { json } => {
            let docs = store.get_documents().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&docs)?);
            } else {
                for doc in &docs {
                    println!("{}", summary_line(doc));
                }
            }
        }
        DocCommand::Show { id, json } => {
            let doc = require(store, &id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print!("{}", doc.content);
                if !doc.content.ends_with('\n') {
                    println!();
                }
            }
        }
        DocCommand::Edit { id, name, body } => {
            let mut doc = require(store, &id).await?;
            doc.content = body.read()?;
            if let Some(name) = name {
                doc.name = name;
            }
            doc.touch();
            store.update_document(&doc).await?;
            println!("{}", doc.id);
        }
        DocCommand::Rm { id } => {
            store.delete_document(&id).await?;
        }
    }
    Ok(())
}

async fn require(store: &DocumentStore, id: &str) -> anyhow::Result<Document> {
    store.get_document(id).await?.ok_or_else(|| {
        ExError::from(MarkkkError::DocumentNotFound {
            document_id: id.to_string(),
        })
        .into()
    })
}

/// One `id  name  last-touched` row for the plain listing
fn summary_line(doc: &Document) -> String {
    format!(
        "{}\t{}\t{}",
        doc.id,
        doc.name,
        timestamp::format(&doc.last_touched())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_uses_last_touched() {
        let mut doc = Document::new("x", Some("notes"));
        let line = summary_line(&doc);
        assert!(line.contains("\tnotes\t"));
        assert!(line.ends_with(&timestamp::format(&doc.created_at)));

        doc.touch();
        let updated = doc.updated_at.unwrap();
        assert!(summary_line(&doc).ends_with(&timestamp::format(&updated)));
    }
}
