//! telroute - attribute-based routing for logs, metrics and traces
//!
//! Library half of the `telroute` binary: subcommand implementations and
//! logging setup, exposed so they can be driven from tests.

pub mod cmd;
pub mod logging;

use std::path::Path;

use anyhow::{Context, Result};
use telroute_config::Config;

/// Load and validate a configuration file
pub fn load_config(path: &Path) -> Result<Config> {
    Config::from_file(path).with_context(|| format!("failed to load config {}", path.display()))
}
