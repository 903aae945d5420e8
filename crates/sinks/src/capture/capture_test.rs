//! Tests for the capture sink

use super::CaptureSink;
use telroute_pipeline::{CallContext, Sink, SinkError};
use telroute_protocol::{
    Attributes, LogRecord, Logs, Metric, Metrics, ResourceLogs, ResourceMetrics, ResourceSpans,
    Span, Traces,
};

fn one_log(body: &str) -> Logs {
    let mut logs = Logs::new();
    logs.push(ResourceLogs::new(Attributes::new()).with_record(LogRecord::new(body)));
    logs
}

#[tokio::test]
async fn test_captures_per_kind() {
    let sink = CaptureSink::new("capture");
    let ctx = CallContext::new();

    let mut metrics = Metrics::new();
    metrics.push(ResourceMetrics::new(Attributes::new()).with_metric(Metric::gauge("cpu", 0.1)));
    let mut traces = Traces::new();
    traces.push(ResourceSpans::new(Attributes::new()).with_span(Span::new("GET /")));

    sink.ingest(&ctx, one_log("a")).await.unwrap();
    sink.ingest(&ctx, one_log("b")).await.unwrap();
    sink.ingest(&ctx, metrics.clone()).await.unwrap();
    sink.ingest(&ctx, traces.clone()).await.unwrap();

    assert_eq!(sink.logs(), vec![one_log("a"), one_log("b")]);
    assert_eq!(sink.metrics_batches(), vec![metrics]);
    assert_eq!(sink.traces(), vec![traces]);
    assert_eq!(sink.batch_count(), 4);
    assert_eq!(sink.snapshot().records_written, 4);
}

#[tokio::test]
async fn test_take_drains() {
    let sink = CaptureSink::new("capture");
    sink.ingest(&CallContext::new(), one_log("a")).await.unwrap();

    assert_eq!(sink.take_logs().len(), 1);
    assert!(sink.take_logs().is_empty());
    assert!(sink.take_metrics().is_empty());
    assert!(sink.take_traces().is_empty());
}

#[tokio::test]
async fn test_fail_next_then_recover() {
    let sink = CaptureSink::new("flaky");
    let ctx = CallContext::new();
    sink.fail_next(2, "backend busy");

    for _ in 0..2 {
        let err = sink.ingest(&ctx, one_log("x")).await.unwrap_err();
        assert!(matches!(err, SinkError::Rejected(ref r) if r == "backend busy"));
    }
    sink.ingest(&ctx, one_log("y")).await.unwrap();

    assert_eq!(sink.logs(), vec![one_log("y")]);
    let snapshot = sink.snapshot();
    assert_eq!(snapshot.batches_received, 3);
    assert_eq!(snapshot.write_errors, 2);
    assert_eq!(snapshot.batches_written, 1);
}

#[tokio::test]
async fn test_fail_always_until_recover() {
    let sink = CaptureSink::new("down");
    let ctx = CallContext::new();
    sink.fail_always("offline");

    for _ in 0..5 {
        assert!(sink.ingest(&ctx, one_log("x")).await.is_err());
    }
    assert_eq!(sink.batch_count(), 0);

    sink.recover();
    sink.ingest(&ctx, one_log("x")).await.unwrap();
    assert_eq!(sink.batch_count(), 1);
}

#[test]
fn test_debug_and_handle() {
    let sink = CaptureSink::new("capture/acme");
    assert!(format!("{sink:?}").contains("capture/acme"));
    assert_eq!(sink.metrics_handle().sink_type(), "capture");
    assert_eq!(sink.name(), "capture/acme");
}
