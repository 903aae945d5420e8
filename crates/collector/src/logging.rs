//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set. Otherwise the `--log-level` flag, and then the
//! `[log]` section, decide the filter.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use telroute_config::{LogConfig, LogFormat, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Initialize the tracing subscriber for logging
pub fn init_logging(config: &LogConfig, level_override: Option<&str>) -> Result<()> {
    let directives = level_override
        .map(str::to_string)
        .unwrap_or_else(|| config.directives());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", directives, e))?;

    let (writer, ansi) = match &config.output {
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {path}"))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_ansi(ansi)
        .with_writer(writer);

    let layer = match config.format {
        LogFormat::Console => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
