//! Gene mention candidate extraction with distant supervision.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;

pub use error::{Error, Result};
