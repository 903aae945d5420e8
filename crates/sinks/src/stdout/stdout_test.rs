//! Tests for the stdout sink

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use telroute_config::StdoutSinkConfig;
use telroute_pipeline::{CallContext, Sink, SinkError};
use telroute_protocol::{Attributes, LogRecord, Logs, ResourceLogs, ResourceSpans, Span, Traces};

use super::{StdoutConfig, StdoutSink};

/// In-memory writer shared with the test
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn lines(&self) -> Vec<Value> {
        let bytes = self.0.lock().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn text(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that always fails
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn tenant_logs(tenant: &str, records: usize) -> Logs {
    let mut group = ResourceLogs::new(Attributes::new().with("tenant", tenant));
    for i in 0..records {
        group = group.with_record(LogRecord::new(format!("message {i}")));
    }
    let mut logs = Logs::new();
    logs.push(group);
    logs
}

// ============================================================================
// Output Format Tests
// ============================================================================

#[tokio::test]
async fn test_one_json_line_per_batch() {
    let buf = SharedBuf::default();
    let sink = StdoutSink::with_writer("otlp/acme", StdoutConfig::default(), buf.clone());
    let ctx = CallContext::new();

    sink.ingest(&ctx, tenant_logs("acme", 2)).await.unwrap();
    sink.ingest(&ctx, tenant_logs("acme", 1)).await.unwrap();

    let lines = buf.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["sink"], "otlp/acme");
    assert_eq!(lines[0]["kind"], "logs");
    assert_eq!(lines[0]["groups"], 1);
    assert_eq!(lines[0]["records"], 2);
    assert!(lines[0]["batch"].is_object());
    assert_eq!(lines[1]["records"], 1);
}

#[tokio::test]
async fn test_batch_body_round_trips() {
    let buf = SharedBuf::default();
    let sink = StdoutSink::with_writer("otlp", StdoutConfig::default(), buf.clone());
    let input = tenant_logs("acme", 3);

    sink.ingest(&CallContext::new(), input.clone()).await.unwrap();

    let line = buf.lines().remove(0);
    let parsed: Logs = serde_json::from_value(line["batch"].clone()).unwrap();
    assert_eq!(parsed, input);
}

#[tokio::test]
async fn test_summary_only_omits_batch() {
    let buf = SharedBuf::default();
    let sink = StdoutSink::with_writer("otlp", StdoutConfig::summary_only(), buf.clone());

    let mut traces = Traces::new();
    traces.push(ResourceSpans::new(Attributes::new()).with_span(Span::new("GET /")));
    sink.ingest(&CallContext::new(), traces).await.unwrap();

    let line = buf.lines().remove(0);
    assert_eq!(line["kind"], "traces");
    assert!(line.get("batch").is_none());
}

#[tokio::test]
async fn test_pretty_output_spans_lines() {
    let buf = SharedBuf::default();
    let sink = StdoutSink::with_writer("otlp", StdoutConfig::pretty(), buf.clone());

    sink.ingest(&CallContext::new(), tenant_logs("acme", 1))
        .await
        .unwrap();

    let text = buf.text();
    assert!(text.lines().count() > 1);
    assert!(text.ends_with('\n'));
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["sink"], "otlp");
}

#[test]
fn test_config_from_sink_section() {
    let section = StdoutSinkConfig {
        summary_only: true,
        ..StdoutSinkConfig::default()
    };

    let sink = StdoutSink::with_config("debug", StdoutConfig::from(&section));
    assert!(sink.config().summary_only);
    assert!(!sink.config().pretty);
}

// ============================================================================
// Metrics and Failure Tests
// ============================================================================

#[tokio::test]
async fn test_metrics_count_bytes() {
    let buf = SharedBuf::default();
    let sink = StdoutSink::with_writer("otlp", StdoutConfig::default(), buf.clone());

    sink.ingest(&CallContext::new(), tenant_logs("acme", 2))
        .await
        .unwrap();

    let snapshot = sink.snapshot();
    assert_eq!(snapshot.batches_written, 1);
    assert_eq!(snapshot.records_written, 2);
    assert_eq!(snapshot.bytes_written, buf.text().len() as u64);
}

#[tokio::test]
async fn test_write_failure_is_reported() {
    let sink = StdoutSink::with_writer("otlp", StdoutConfig::default(), BrokenPipe);

    let err = sink
        .ingest(&CallContext::new(), tenant_logs("acme", 1))
        .await
        .unwrap_err();

    assert!(matches!(err, SinkError::Io(_)));
    let snapshot = sink.snapshot();
    assert_eq!(snapshot.write_errors, 1);
    assert_eq!(snapshot.batches_written, 0);
}

#[test]
fn test_metrics_handle() {
    let sink = StdoutSink::new("debug");
    let handle = sink.metrics_handle();
    assert_eq!(handle.name(), "debug");
    assert_eq!(handle.sink_type(), "stdout");
}
