//! CLI entry-point for inspecting the dictionary directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, data::dictionaries::Dictionaries};

/// Args for the `dicts` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Dictionary directory, overriding `GENESUP_DICT_DIR`.
    #[arg(long)]
    pub dicts: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let dir = args.dicts.unwrap_or(settings.dict_dir);
    let dicts = Dictionaries::load(&dir)
        .with_context(|| format!("loading dictionaries from {}", dir.display()))?;
    println!("{}", serde_json::to_string_pretty(&dicts.stats())?);
    Ok(())
}
