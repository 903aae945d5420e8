//! Routing processor - attribute-based batch splitting with sink fan-out
//!
//! The `RoutingProcessor` receives batches of one record kind, extracts a
//! route value from the call context or from each resource, and forwards
//! (sub-)batches to the sinks the pre-compiled routing table selects.

use std::fmt;
use std::sync::Arc;

use telroute_config::{AttributeSource, RoutingConfig};
use telroute_protocol::{CallContext, ResourceGroup};
use telroute_routing::{DestinationId, RouteKey, RoutingTable, RoutingTableBuilder, SinkId};

use crate::error::{DispatchError, PipelineError, Result, SinkError, SinkFailure};
use crate::host::{Host, Signal};
use crate::metrics::{RouterMetrics, RouterMetricsHandle};
use crate::sink_handle::SinkHandle;

/// What the processor does to data passing through it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Forwarded batches differ from the input (routing attribute removed)
    ///
    /// A caller that shares a batch must hand in a copy when this is set.
    pub mutates_data: bool,
}

/// Lifecycle state
enum State<B> {
    /// Constructed, sinks not resolved yet
    Created,
    /// Started; handles indexed by `SinkId`
    Running(Vec<SinkHandle<B>>),
    /// Shut down; handles released
    Stopped,
}

impl<B> State<B> {
    fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running(_) => "running",
            Self::Stopped => "stopped",
        }
    }
}

/// An outgoing batch and the destination it was built for
struct Outgoing<B> {
    destination: DestinationId,
    batch: B,
}

/// Routes batches of kind `B` to sinks by attribute value
///
/// # Design
///
/// - Config is validated and the `RoutingTable` compiled once, in `new`
/// - Sink names are resolved once, in `start`, into a `Vec<SinkHandle<B>>`
///   indexed by `SinkId` for O(1) lookup
/// - `consume` takes `&self` and only reads the table and handles, so
///   concurrent calls need no locking
/// - Resource groups bound for the same ordered sink list are merged into one
///   outgoing batch; outgoing batches keep order of first appearance
/// - Fan-out is sequential; every sink is attempted and all failures are
///   reported together
///
/// # Example
///
/// ```ignore
/// let config = RoutingConfig::new("X-Tenant")
///     .with_default(["otlp"])
///     .with_route("acme", ["otlp/acme"]);
///
/// let mut processor = RoutingProcessor::<Logs>::new(config)?;
/// processor.start(&registry)?;
///
/// let ctx = CallContext::new().with_metadata("X-Tenant", "acme");
/// processor.consume(&ctx, logs).await?;
///
/// processor.shutdown();
/// ```
pub struct RoutingProcessor<B: Signal> {
    /// Validated configuration
    config: RoutingConfig,

    /// Pre-compiled routing table
    table: RoutingTable,

    /// Lifecycle state, holding the resolved sinks while running
    state: State<B>,

    /// Processor metrics (Arc for sharing with metrics handle)
    metrics: Arc<RouterMetrics>,
}

impl<B: Signal> RoutingProcessor<B> {
    /// Create a processor from configuration
    ///
    /// Validates the config and compiles the routing table. Sinks are not
    /// resolved until `start`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` for an invalid config.
    pub fn new(config: RoutingConfig) -> Result<Self> {
        config.validate()?;

        if config.drop_is_ignored() {
            tracing::warn!(
                kind = %B::KIND,
                attribute_source = config.attribute_source.as_str(),
                "drop_resource_routing_attribute ignored outside resource mode"
            );
        }

        let table = compile_table(&config)?;

        tracing::debug!(
            kind = %B::KIND,
            from_attribute = %config.from_attribute,
            attribute_source = config.attribute_source.as_str(),
            route_count = table.route_count(),
            sink_count = table.sink_count(),
            "routing table compiled"
        );

        Ok(Self {
            config,
            table,
            state: State::Created,
            metrics: Arc::new(RouterMetrics::new()),
        })
    }

    /// Resolve every referenced sink through the host
    ///
    /// Each distinct sink name is looked up once. A failure leaves the
    /// processor inactive (it can be started again with a better host).
    ///
    /// # Errors
    ///
    /// - `UnknownSink` if the host has no sink of that name
    /// - `IncompatibleSink` if it exists but not for this record kind
    /// - `AlreadyStarted` / `AlreadyStopped` on lifecycle misuse
    pub fn start(&mut self, host: &dyn Host) -> Result<()> {
        match self.state {
            State::Created => {}
            State::Running(_) => return Err(PipelineError::AlreadyStarted),
            State::Stopped => return Err(PipelineError::AlreadyStopped),
        }

        let mut sinks = Vec::with_capacity(self.table.sink_count());
        for (index, name) in self.table.sink_names().iter().enumerate() {
            let Some(sink) = B::lookup_sink(host, name) else {
                if host.has_sink(name) {
                    return Err(PipelineError::incompatible_sink(name.as_str(), B::KIND));
                }
                return Err(PipelineError::unknown_sink(name.as_str(), B::KIND));
            };
            sinks.push(SinkHandle::new(
                SinkId::new(index as u16),
                name.as_str(),
                sink,
            ));
        }

        tracing::info!(
            kind = %B::KIND,
            from_attribute = %self.config.from_attribute,
            attribute_source = self.config.attribute_source.as_str(),
            route_count = self.table.route_count(),
            sink_count = sinks.len(),
            mutates_data = self.config.mutates_data(),
            "routing processor started"
        );

        self.state = State::Running(sinks);
        Ok(())
    }

    /// Release all sink handles
    ///
    /// Later `consume` calls fail with `Stopped`. Idempotent.
    pub fn shutdown(&mut self) {
        if matches!(self.state, State::Stopped) {
            return;
        }
        self.state = State::Stopped;

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            kind = %B::KIND,
            batches_received = snapshot.batches_received,
            batches_forwarded = snapshot.batches_forwarded,
            batches_dropped = snapshot.batches_dropped,
            sink_sends_success = snapshot.sink_sends_success,
            sink_sends_failed = snapshot.sink_sends_failed,
            "routing processor stopped"
        );
    }

    /// What this processor does to forwarded data
    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            mutates_data: self.config.mutates_data(),
        }
    }

    /// Check if the processor is started and not stopped
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Get a metrics handle for reporting
    ///
    /// The handle remains valid after shutdown.
    pub fn metrics_handle(&self) -> RouterMetricsHandle {
        RouterMetricsHandle::new(Arc::clone(&self.metrics))
    }

    /// Get the current metrics
    #[inline]
    pub fn metrics(&self) -> &RouterMetrics {
        &self.metrics
    }

    /// Get the compiled routing table
    #[inline]
    pub fn routing_table(&self) -> &RoutingTable {
        &self.table
    }

    /// Get the configuration
    #[inline]
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Route one batch
    ///
    /// Absence of the routing attribute is not an error: such data takes the
    /// default route. Data whose route has no sinks is dropped silently.
    ///
    /// # Errors
    ///
    /// - `NotStarted` / `Stopped` outside the running state
    /// - `Cancelled` if the context is cancelled or past its deadline;
    ///   no sink is contacted
    /// - `Dispatch` listing every sink that failed; the other sinks still
    ///   received their batches
    pub async fn consume(&self, ctx: &CallContext, batch: B) -> Result<()> {
        let sinks = match &self.state {
            State::Running(sinks) => sinks,
            State::Created => return Err(PipelineError::NotStarted),
            State::Stopped => return Err(PipelineError::Stopped),
        };

        if ctx.is_done() {
            self.metrics.record_cancelled();
            tracing::debug!(
                kind = %B::KIND,
                cancelled = ctx.is_cancelled(),
                deadline_exceeded = ctx.deadline_exceeded(),
                "call context done before dispatch"
            );
            return Err(PipelineError::Cancelled);
        }

        self.metrics.record_received(batch.record_count() as u64);

        let outgoing = match self.config.attribute_source {
            AttributeSource::Context => self.route_by_context(ctx, batch),
            AttributeSource::Resource => self.route_by_resource(batch),
        };

        if outgoing.is_empty() {
            self.metrics.record_dropped();
            return Ok(());
        }

        self.dispatch(ctx, sinks, outgoing).await
    }

    /// Whole batch to one destination, chosen by call metadata
    fn route_by_context(&self, ctx: &CallContext, batch: B) -> Vec<Outgoing<B>> {
        let key = RouteKey::from(ctx.metadata(&self.config.from_attribute));
        let destination = self.table.route(key);

        self.metrics
            .record_decision(destination.matched, destination.is_drop());

        if destination.is_drop() {
            tracing::trace!(
                kind = %B::KIND,
                key = %key,
                groups = batch.group_count(),
                "no sinks for route, dropping batch"
            );
            return Vec::new();
        }

        tracing::debug!(
            kind = %B::KIND,
            key = %key,
            matched = destination.matched,
            sinks = destination.sinks.len(),
            "routed batch by context"
        );

        vec![Outgoing {
            destination: destination.id,
            batch,
        }]
    }

    /// Split by resource attribute, merging groups per destination
    fn route_by_resource(&self, batch: B) -> Vec<Outgoing<B>> {
        let attribute = self.config.from_attribute.as_str();
        let remove_attribute = self.config.mutates_data();

        let mut merged: Vec<(DestinationId, Vec<B::Group>)> = Vec::new();

        for mut group in batch.into_resource_groups() {
            let (id, matched, dropped) = {
                let key = RouteKey::from(group.resource().attributes.get_str(attribute));
                let destination = self.table.route(key);

                if destination.is_drop() {
                    tracing::trace!(
                        kind = %B::KIND,
                        key = %key,
                        records = group.record_count(),
                        "no sinks for route, dropping resource group"
                    );
                }
                (destination.id, destination.matched, destination.is_drop())
            };

            self.metrics.record_decision(matched, dropped);
            if dropped {
                continue;
            }

            if remove_attribute && group.resource_mut().attributes.remove(attribute).is_some() {
                self.metrics.record_attribute_removed();
            }

            match merged.iter_mut().find(|(dest, _)| *dest == id) {
                Some((_, groups)) => groups.push(group),
                None => merged.push((id, vec![group])),
            }
        }

        tracing::debug!(
            kind = %B::KIND,
            outgoing = merged.len(),
            "split batch by resource attribute"
        );

        merged
            .into_iter()
            .map(|(destination, groups)| Outgoing {
                destination,
                batch: B::from_resource_groups(groups),
            })
            .collect()
    }

    /// Fan outgoing batches out to their sinks
    ///
    /// Every sink is attempted regardless of earlier failures.
    async fn dispatch(
        &self,
        ctx: &CallContext,
        sinks: &[SinkHandle<B>],
        outgoing: Vec<Outgoing<B>>,
    ) -> Result<()> {
        let mut failures = Vec::new();
        let mut attempted = 0;

        for Outgoing { destination, batch } in outgoing {
            let ids = self.table.destination(destination).unwrap_or_default();
            self.metrics.record_forwarded();

            // Clone for every sink but the last, which takes the batch itself
            let Some((&last, rest)) = ids.split_last() else {
                continue;
            };
            for &id in rest {
                attempted += 1;
                self.send(ctx, sinks, id, batch.clone(), &mut failures)
                    .await;
            }
            attempted += 1;
            self.send(ctx, sinks, last, batch, &mut failures).await;
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::new(failures, attempted).into())
        }
    }

    async fn send(
        &self,
        ctx: &CallContext,
        sinks: &[SinkHandle<B>],
        id: SinkId,
        batch: B,
        failures: &mut Vec<SinkFailure>,
    ) {
        let Some(handle) = sinks.get(id.as_usize()) else {
            tracing::warn!(sink_id = %id, "sink not resolved, skipping");
            self.metrics.record_sink_send_failed();
            failures.push(SinkFailure {
                sink: id.to_string(),
                error: SinkError::Closed,
            });
            return;
        };

        match handle.ingest(ctx, batch).await {
            Ok(()) => self.metrics.record_sink_send_success(),
            Err(error) => {
                self.metrics.record_sink_send_failed();
                tracing::warn!(
                    kind = %B::KIND,
                    sink_name = %handle.name(),
                    error = %error,
                    "sink delivery failed"
                );
                failures.push(SinkFailure {
                    sink: handle.name().to_string(),
                    error,
                });
            }
        }
    }
}

/// Compile the routing table from a validated config
fn compile_table(config: &RoutingConfig) -> Result<RoutingTable> {
    let mut builder = RoutingTableBuilder::new();
    builder.set_default_by_name(config.default_exporters.as_slice())?;
    for entry in &config.table {
        builder.add_route_by_name(&entry.value, entry.exporters.as_slice())?;
    }
    Ok(builder.build())
}

impl<B: Signal> fmt::Debug for RoutingProcessor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingProcessor")
            .field("kind", &B::KIND)
            .field("state", &self.state.name())
            .field("from_attribute", &self.config.from_attribute)
            .field("route_count", &self.table.route_count())
            .field("sink_count", &self.table.sink_count())
            .finish()
    }
}
