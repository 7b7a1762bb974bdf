//! CLI definitions and command implementations.

pub mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use keyvault_app::{BackendKind, StorageConfig};

/// KeyVault - local store for API keys
#[derive(Parser)]
#[command(name = "keyvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage backend: relational (SQLite) or key-value (JSON file)
    #[arg(short, long, global = true)]
    pub backend: Option<BackendKind>,

    /// Directory holding the store (default: platform data dir)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn storage_config(&self) -> anyhow::Result<StorageConfig> {
        let data_dir = match self.data_dir {
            Some(ref dir) => dir.clone(),
            None => dirs::data_local_dir()
                .context("Could not determine the local data directory; pass --data-dir")?
                .join("keyvault"),
        };

        let mut config = StorageConfig::new(data_dir);
        config.backend = self.backend;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a new API key
    Add(AddArgs),

    /// List all API keys, most recently updated first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search API keys by name, organization or description
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// The secret value
    #[arg(short, long)]
    pub key: String,

    #[arg(short, long)]
    pub organization: Option<String>,

    #[arg(short, long)]
    pub project_id: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}
