//! Route command - send one batch through the routing processor
//!
//! Reads a JSON batch (OTLP JSON shape) from a file or stdin and routes it
//! with the configured table. With `--dry-run` every referenced sink is
//! replaced by a capture sink and a per-sink summary is printed instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::de::DeserializeOwned;
use telroute_config::Config;
use telroute_pipeline::{Host, MetricsSnapshot, RoutingProcessor, Signal, SinkRegistry};
use telroute_protocol::{CallContext, Logs, Metrics, SignalKind, Traces};
use telroute_sinks::build_sinks;
use telroute_sinks::capture::CaptureSink;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Route command arguments
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Record kind of the input batch (logs, metrics, traces)
    #[arg(short, long)]
    pub signal: SignalKind,

    /// JSON file holding one batch ("-" for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Call metadata entry, repeatable
    #[arg(short, long = "metadata", value_name = "KEY=VALUE")]
    pub metadata: Vec<String>,

    /// Capture deliveries and print a summary instead of writing to sinks
    #[arg(long)]
    pub dry_run: bool,

    /// Deadline for the call, in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

/// Build the call context from `key=value` entries and an optional deadline
pub fn build_context(metadata: &[String], timeout_ms: Option<u64>) -> Result<CallContext> {
    let mut ctx = CallContext::new();
    for entry in metadata {
        ctx.insert_metadata_pair(entry)
            .with_context(|| format!("invalid --metadata '{entry}'"))?;
    }
    if let Some(ms) = timeout_ms {
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }
    Ok(ctx)
}

/// Registry where every sink referenced by routing is a capture sink
///
/// Each capture is registered for the kinds the configured sink accepts, so
/// wrong-kind references still fail the way they would for real.
pub fn capture_registry(config: &Config) -> (SinkRegistry, Vec<Arc<CaptureSink>>) {
    let mut registry = SinkRegistry::new();
    let mut captures = Vec::new();

    for name in config.routing.referenced_sinks() {
        let Some(sink_config) = config.sinks.resolve(name) else {
            continue;
        };
        let kinds: Vec<SignalKind> = SignalKind::ALL
            .into_iter()
            .filter(|kind| sink_config.accepts(*kind))
            .collect();

        let capture = Arc::new(CaptureSink::new(name));
        registry.register(name, Arc::clone(&capture), &kinds);
        captures.push(capture);
    }

    (registry, captures)
}

/// Route one JSON-encoded batch of kind `B`
///
/// Returns the processor metrics for the call.
pub async fn route_batch<B>(
    config: &Config,
    host: &dyn Host,
    ctx: &CallContext,
    input: &[u8],
) -> Result<MetricsSnapshot>
where
    B: Signal + DeserializeOwned,
{
    let batch: B = serde_json::from_slice(input)
        .with_context(|| format!("failed to parse input as {}", B::KIND))?;

    let mut processor = RoutingProcessor::<B>::new(config.routing.clone())?;
    processor.start(host)?;

    let result = processor.consume(ctx, batch).await;
    let metrics = processor.metrics_handle();
    processor.shutdown();

    result?;
    Ok(metrics.snapshot())
}

/// Route one batch of the given kind
pub async fn route_signal(
    kind: SignalKind,
    config: &Config,
    host: &dyn Host,
    ctx: &CallContext,
    input: &[u8],
) -> Result<MetricsSnapshot> {
    match kind {
        SignalKind::Logs => route_batch::<Logs>(config, host, ctx, input).await,
        SignalKind::Metrics => route_batch::<Metrics>(config, host, ctx, input).await,
        SignalKind::Traces => route_batch::<Traces>(config, host, ctx, input).await,
    }
}

/// Read the input batch from `path`, or from stdin when `path` is `-`
pub async fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Run the route command
pub async fn run(config: &Config, args: RouteArgs) -> Result<()> {
    let input = read_input(&args.input).await?;
    let ctx = build_context(&args.metadata, args.timeout_ms)?;

    let (registry, captures) = if args.dry_run {
        capture_registry(config)
    } else {
        (build_sinks(config).into_registry(), Vec::new())
    };

    let snapshot = route_signal(args.signal, config, &registry, &ctx, &input).await?;

    info!(
        kind = %args.signal,
        batches_forwarded = snapshot.batches_forwarded,
        groups_routed_by_table = snapshot.groups_routed_by_table,
        groups_routed_by_default = snapshot.groups_routed_by_default,
        groups_dropped = snapshot.groups_dropped,
        "batch routed"
    );

    for capture in &captures {
        let s = capture.snapshot();
        let line = serde_json::json!({
            "sink": capture.name(),
            "batches": s.batches_written,
            "records": s.records_written,
        });
        println!("{line}");
    }

    Ok(())
}
