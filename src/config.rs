//! Runtime configuration utilities for genesup.

use std::{env, path::PathBuf};

use serde::Deserialize;

pub const DICT_DIR_VAR: &str = "GENESUP_DICT_DIR";
pub const WORKERS_VAR: &str = "GENESUP_WORKERS";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory holding the gene, English, stopword and long-name tables.
    pub dict_dir: PathBuf,
    /// Records processed concurrently by `extract`.
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dict_dir: PathBuf::from("./dicts"),
            workers: 1,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let dict_dir = env::var(DICT_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.dict_dir);
        let workers = env::var(WORKERS_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.workers);

        Ok(Self { dict_dir, workers })
    }
}
