//! Check command - validate configuration and resolve routes
//!
//! Loads the config, builds the configured sinks and starts one routing
//! processor per requested record kind, so unknown and wrong-kind sinks are
//! reported without sending any data.

use anyhow::{Result, bail};
use clap::Args;
use telroute_config::Config;
use telroute_pipeline::{Host, PipelineError, RoutingProcessor, Signal};
use telroute_protocol::{Logs, Metrics, SignalKind, Traces};
use telroute_sinks::build_sinks;
use tracing::{error, info};

/// Check command arguments
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Record kinds to check (default: all)
    #[arg(short, long = "signal", value_name = "KIND")]
    pub signals: Vec<SignalKind>,
}

/// Outcome of checking one record kind
#[derive(Debug)]
pub struct KindReport {
    /// Record kind that was checked
    pub kind: SignalKind,
    /// Number of resolved sinks, or why the processor failed to start
    pub result: std::result::Result<usize, PipelineError>,
}

/// Check `config` for each requested kind
///
/// Returns one report per kind; the caller decides how to present them.
pub fn check_config(config: &Config, signals: &[SignalKind]) -> Vec<KindReport> {
    let sinks = build_sinks(config);
    let kinds: &[SignalKind] = if signals.is_empty() {
        &SignalKind::ALL
    } else {
        signals
    };

    kinds
        .iter()
        .map(|&kind| {
            let result = match kind {
                SignalKind::Logs => start_once::<Logs>(config, sinks.registry()),
                SignalKind::Metrics => start_once::<Metrics>(config, sinks.registry()),
                SignalKind::Traces => start_once::<Traces>(config, sinks.registry()),
            };
            KindReport { kind, result }
        })
        .collect()
}

/// Start and immediately stop a processor, returning its sink count
fn start_once<B: Signal>(
    config: &Config,
    host: &dyn Host,
) -> std::result::Result<usize, PipelineError> {
    let mut processor = RoutingProcessor::<B>::new(config.routing.clone())?;
    processor.start(host)?;
    let sinks = processor.routing_table().sink_count();
    processor.shutdown();
    Ok(sinks)
}

/// Run the check command
pub fn run(config: &Config, args: CheckArgs) -> Result<()> {
    let reports = check_config(config, &args.signals);

    let mut failed = 0;
    for report in &reports {
        match &report.result {
            Ok(sinks) => {
                info!(kind = %report.kind, sinks, "routes resolved");
                println!("{:<8} ok ({} sinks)", report.kind, sinks);
            }
            Err(e) => {
                failed += 1;
                error!(kind = %report.kind, error = %e, "routes failed to resolve");
                println!("{:<8} error: {}", report.kind, e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} record kinds failed to resolve", failed, reports.len());
    }

    println!(
        "configuration OK: {} routes, {} default sinks",
        config.routing.table.len(),
        config.routing.default_exporters.len()
    );
    Ok(())
}
