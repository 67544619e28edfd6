//! Command-line interface wiring for genesup.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod dicts;
pub mod extract;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Gene mention extraction with distant supervision",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Extract(args) => extract::run(args, settings).await,
            Commands::Dicts(args) => dicts::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract, featurise and supervise gene mentions from sentence records.
    Extract(extract::Args),
    /// Report the size of each loaded dictionary.
    Dicts(dicts::Args),
}
