//! Routing processor metrics
//!
//! Atomic counters for tracking routing decisions and sink delivery.
//! All operations use relaxed ordering for maximum performance.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the routing processor
///
/// All counters use relaxed ordering; values are eventually consistent, not
/// real-time. All methods are safe to call from concurrent `consume` calls.
#[derive(Debug, Default)]
pub struct RouterMetrics {
    /// Batches passed to `consume`
    batches_received: AtomicU64,

    /// Records (log records, data points, spans) received
    records_received: AtomicU64,

    /// Outgoing batches built (one per distinct destination per call)
    batches_forwarded: AtomicU64,

    /// Resource groups (or whole batches in context mode) matched by a table entry
    groups_routed_by_table: AtomicU64,

    /// Resource groups (or whole batches in context mode) sent to the default route
    groups_routed_by_default: AtomicU64,

    /// Resource groups (or whole batches in context mode) dropped: no sinks
    groups_dropped: AtomicU64,

    /// Calls that delivered nothing because every group resolved to no sinks
    batches_dropped: AtomicU64,

    /// Individual sink deliveries that succeeded
    sink_sends_success: AtomicU64,

    /// Individual sink deliveries that failed
    sink_sends_failed: AtomicU64,

    /// Routing attributes removed from forwarded resources
    attributes_removed: AtomicU64,

    /// Calls rejected because the context was cancelled or past its deadline
    calls_cancelled: AtomicU64,
}

impl RouterMetrics {
    /// Create new metrics instance with all counters at zero
    #[inline]
    pub const fn new() -> Self {
        Self {
            batches_received: AtomicU64::new(0),
            records_received: AtomicU64::new(0),
            batches_forwarded: AtomicU64::new(0),
            groups_routed_by_table: AtomicU64::new(0),
            groups_routed_by_default: AtomicU64::new(0),
            groups_dropped: AtomicU64::new(0),
            batches_dropped: AtomicU64::new(0),
            sink_sends_success: AtomicU64::new(0),
            sink_sends_failed: AtomicU64::new(0),
            attributes_removed: AtomicU64::new(0),
            calls_cancelled: AtomicU64::new(0),
        }
    }

    /// Record a batch entering `consume`
    #[inline]
    pub fn record_received(&self, record_count: u64) {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
        self.records_received
            .fetch_add(record_count, Ordering::Relaxed);
    }

    /// Record one routing decision
    #[inline]
    pub fn record_decision(&self, matched: bool, dropped: bool) {
        if dropped {
            self.groups_dropped.fetch_add(1, Ordering::Relaxed);
        }
        if matched {
            self.groups_routed_by_table.fetch_add(1, Ordering::Relaxed);
        } else {
            self.groups_routed_by_default
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record an outgoing batch
    #[inline]
    pub fn record_forwarded(&self) {
        self.batches_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call that had nothing to deliver
    #[inline]
    pub fn record_dropped(&self) {
        self.batches_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delivery to a sink
    #[inline]
    pub fn record_sink_send_success(&self) {
        self.sink_sends_success.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed delivery to a sink
    #[inline]
    pub fn record_sink_send_failed(&self) {
        self.sink_sends_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a routing attribute removed from a forwarded resource
    #[inline]
    pub fn record_attribute_removed(&self) {
        self.attributes_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call rejected as cancelled
    #[inline]
    pub fn record_cancelled(&self) {
        self.calls_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    #[inline]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_received: self.batches_received.load(Ordering::Relaxed),
            records_received: self.records_received.load(Ordering::Relaxed),
            batches_forwarded: self.batches_forwarded.load(Ordering::Relaxed),
            groups_routed_by_table: self.groups_routed_by_table.load(Ordering::Relaxed),
            groups_routed_by_default: self.groups_routed_by_default.load(Ordering::Relaxed),
            groups_dropped: self.groups_dropped.load(Ordering::Relaxed),
            batches_dropped: self.batches_dropped.load(Ordering::Relaxed),
            sink_sends_success: self.sink_sends_success.load(Ordering::Relaxed),
            sink_sends_failed: self.sink_sends_failed.load(Ordering::Relaxed),
            attributes_removed: self.attributes_removed.load(Ordering::Relaxed),
            calls_cancelled: self.calls_cancelled.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of router metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Batches passed to `consume`
    pub batches_received: u64,
    /// Records received
    pub records_received: u64,
    /// Outgoing batches built
    pub batches_forwarded: u64,
    /// Groups matched by a table entry
    pub groups_routed_by_table: u64,
    /// Groups sent to the default route
    pub groups_routed_by_default: u64,
    /// Groups dropped for lack of sinks
    pub groups_dropped: u64,
    /// Calls with nothing to deliver
    pub batches_dropped: u64,
    /// Successful sink deliveries
    pub sink_sends_success: u64,
    /// Failed sink deliveries
    pub sink_sends_failed: u64,
    /// Routing attributes removed
    pub attributes_removed: u64,
    /// Calls rejected as cancelled
    pub calls_cancelled: u64,
}

impl MetricsSnapshot {
    /// Calculate sink delivery success rate (0.0 - 1.0)
    ///
    /// Returns None if no deliveries have been attempted.
    #[inline]
    pub fn sink_success_rate(&self) -> Option<f64> {
        let total = self.sink_sends_success + self.sink_sends_failed;
        if total == 0 {
            None
        } else {
            Some(self.sink_sends_success as f64 / total as f64)
        }
    }

    /// Calculate the difference from another snapshot
    ///
    /// Useful for calculating rates over time intervals.
    #[inline]
    pub fn diff(&self, previous: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_received: self
                .batches_received
                .saturating_sub(previous.batches_received),
            records_received: self
                .records_received
                .saturating_sub(previous.records_received),
            batches_forwarded: self
                .batches_forwarded
                .saturating_sub(previous.batches_forwarded),
            groups_routed_by_table: self
                .groups_routed_by_table
                .saturating_sub(previous.groups_routed_by_table),
            groups_routed_by_default: self
                .groups_routed_by_default
                .saturating_sub(previous.groups_routed_by_default),
            groups_dropped: self.groups_dropped.saturating_sub(previous.groups_dropped),
            batches_dropped: self
                .batches_dropped
                .saturating_sub(previous.batches_dropped),
            sink_sends_success: self
                .sink_sends_success
                .saturating_sub(previous.sink_sends_success),
            sink_sends_failed: self
                .sink_sends_failed
                .saturating_sub(previous.sink_sends_failed),
            attributes_removed: self
                .attributes_removed
                .saturating_sub(previous.attributes_removed),
            calls_cancelled: self
                .calls_cancelled
                .saturating_sub(previous.calls_cancelled),
        }
    }
}

/// Handle for reading processor metrics externally
///
/// Remains valid after the processor is shut down or dropped.
#[derive(Debug, Clone)]
pub struct RouterMetricsHandle {
    metrics: Arc<RouterMetrics>,
}

impl RouterMetricsHandle {
    pub(crate) fn new(metrics: Arc<RouterMetrics>) -> Self {
        Self { metrics }
    }

    /// Get a snapshot of the current counters
    #[inline]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = RouterMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_received() {
        let metrics = RouterMetrics::new();

        metrics.record_received(100);
        metrics.record_received(50);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.batches_received, 2);
        assert_eq!(snapshot.records_received, 150);
    }

    #[test]
    fn test_record_decision() {
        let metrics = RouterMetrics::new();

        metrics.record_decision(true, false);
        metrics.record_decision(false, false);
        metrics.record_decision(false, true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.groups_routed_by_table, 1);
        assert_eq!(snapshot.groups_routed_by_default, 2);
        assert_eq!(snapshot.groups_dropped, 1);
    }

    #[test]
    fn test_record_sink_sends() {
        let metrics = RouterMetrics::new();

        metrics.record_sink_send_success();
        metrics.record_sink_send_success();
        metrics.record_sink_send_failed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sink_sends_success, 2);
        assert_eq!(snapshot.sink_sends_failed, 1);
    }

    #[test]
    fn test_snapshot_sink_success_rate() {
        let snapshot = MetricsSnapshot {
            sink_sends_success: 90,
            sink_sends_failed: 10,
            ..Default::default()
        };
        assert_eq!(snapshot.sink_success_rate(), Some(0.9));
        assert_eq!(MetricsSnapshot::default().sink_success_rate(), None);
    }

    #[test]
    fn test_snapshot_diff() {
        let prev = MetricsSnapshot {
            batches_received: 100,
            records_received: 10000,
            batches_forwarded: 120,
            ..Default::default()
        };

        let current = MetricsSnapshot {
            batches_received: 200,
            records_received: 20000,
            batches_forwarded: 250,
            ..Default::default()
        };

        let diff = current.diff(&prev);
        assert_eq!(diff.batches_received, 100);
        assert_eq!(diff.records_received, 10000);
        assert_eq!(diff.batches_forwarded, 130);
    }

    #[test]
    fn test_snapshot_diff_saturating() {
        let prev = MetricsSnapshot {
            batches_received: 100,
            ..Default::default()
        };
        let current = MetricsSnapshot {
            batches_received: 50,
            ..Default::default()
        };

        assert_eq!(current.diff(&prev).batches_received, 0);
    }

    #[test]
    fn test_handle_shares_counters() {
        let metrics = Arc::new(RouterMetrics::new());
        let handle = RouterMetricsHandle::new(Arc::clone(&metrics));

        metrics.record_attribute_removed();
        metrics.record_cancelled();

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.attributes_removed, 1);
        assert_eq!(snapshot.calls_cancelled, 1);
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let metrics = Arc::new(RouterMetrics::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let m = Arc::clone(&metrics);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    m.record_received(1);
                    m.record_forwarded();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.batches_received, 4000);
        assert_eq!(snapshot.batches_forwarded, 4000);
        assert_eq!(snapshot.records_received, 4000);
    }
}
