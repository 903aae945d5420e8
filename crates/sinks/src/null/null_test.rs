//! Tests for the null sink

use super::NullSink;
use telroute_pipeline::{CallContext, Sink};
use telroute_protocol::{
    Attributes, LogRecord, Logs, Metric, Metrics, ResourceLogs, ResourceMetrics, ResourceSpans,
    Span, Traces,
};

/// Helper to create a logs batch with the given record count
fn create_test_logs(record_count: usize) -> Logs {
    let mut group = ResourceLogs::new(Attributes::new().with("service.name", "test"));
    for i in 0..record_count {
        group = group.with_record(LogRecord::new(format!("test message {i}")));
    }
    let mut logs = Logs::new();
    logs.push(group);
    logs
}

// ============================================================================
// Ingest Tests
// ============================================================================

#[tokio::test]
async fn test_null_sink_counts_records() {
    let sink = NullSink::new();
    let ctx = CallContext::new();

    sink.ingest(&ctx, create_test_logs(10)).await.unwrap();
    sink.ingest(&ctx, create_test_logs(5)).await.unwrap();

    let snapshot = sink.snapshot();
    assert_eq!(snapshot.batches_received, 2);
    assert_eq!(snapshot.batches_written, 2);
    assert_eq!(snapshot.records_written, 15);
    assert_eq!(snapshot.bytes_written, 0);
}

#[tokio::test]
async fn test_null_sink_accepts_every_kind() {
    let sink = NullSink::with_name("discard");
    let ctx = CallContext::new();

    let mut metrics = Metrics::new();
    metrics.push(ResourceMetrics::new(Attributes::new()).with_metric(Metric::gauge("cpu", 1.0)));
    let mut traces = Traces::new();
    traces.push(ResourceSpans::new(Attributes::new()).with_span(Span::new("GET /")));

    sink.ingest(&ctx, create_test_logs(1)).await.unwrap();
    sink.ingest(&ctx, metrics).await.unwrap();
    sink.ingest(&ctx, traces).await.unwrap();

    assert_eq!(sink.snapshot().records_written, 3);
}

#[tokio::test]
async fn test_null_sink_empty_batch() {
    let sink = NullSink::new();
    sink.ingest(&CallContext::new(), Logs::new()).await.unwrap();

    let snapshot = sink.snapshot();
    assert_eq!(snapshot.batches_received, 1);
    assert_eq!(snapshot.records_written, 0);
}

// ============================================================================
// Handle Tests
// ============================================================================

#[tokio::test]
async fn test_metrics_handle_outlives_sink() {
    let sink = NullSink::with_name("bench");
    let handle = sink.metrics_handle();

    sink.ingest(&CallContext::new(), create_test_logs(4))
        .await
        .unwrap();
    drop(sink);

    assert_eq!(handle.name(), "bench");
    assert_eq!(handle.sink_type(), "null");
    assert_eq!(handle.snapshot().records_written, 4);
}

#[test]
fn test_default_name() {
    assert_eq!(NullSink::default().name(), "null");
}
