//! Tests for common sink types and utilities

use std::sync::Arc;

use crate::{MetricsSnapshot, SinkMetrics, SinkMetricsHandle};

#[test]
fn test_metrics_new() {
    let metrics = SinkMetrics::new();
    assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
}

#[test]
fn test_metrics_batch_tracking() {
    let metrics = SinkMetrics::new();

    metrics.batch_received();
    metrics.batch_received();
    metrics.batch_written(100, 5000);
    metrics.batch_written(200, 10000);
    metrics.write_error();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.batches_received, 2);
    assert_eq!(snapshot.batches_written, 2);
    assert_eq!(snapshot.records_written, 300);
    assert_eq!(snapshot.bytes_written, 15000);
    assert_eq!(snapshot.write_errors, 1);
}

#[test]
fn test_metrics_reset() {
    let metrics = SinkMetrics::new();
    metrics.batch_received();
    metrics.batch_written(10, 100);
    metrics.reset();
    assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
}

#[test]
fn test_handle_shares_counters() {
    let metrics = Arc::new(SinkMetrics::new());
    let handle = SinkMetricsHandle::new("otlp".into(), "null", Arc::clone(&metrics));

    metrics.batch_written(3, 0);

    assert_eq!(handle.name(), "otlp");
    assert_eq!(handle.sink_type(), "null");
    assert_eq!(handle.snapshot().records_written, 3);
}
