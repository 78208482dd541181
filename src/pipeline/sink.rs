//! Pluggable event output for the pipeline.
//!
//! Emission is fire-and-forget: a closed or failing transport must never
//! abort the job, so `emit` swallows write errors. The job still runs to
//! completion and cleanup server-side when the caller goes away.

use crate::pipeline::events::ProgressEvent;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ordered, append-only event output for one job.
pub trait EventSink: Send + Sync {
    /// Deliver one event. Best-effort; never fails.
    fn emit(&self, event: &ProgressEvent);

    /// Close the stream. Called exactly once per job, after cleanup.
    /// Must be idempotent.
    fn close(&self) {}
}

/// Writes newline-delimited JSON events to any `Write`.
///
/// Each event is one UTF-8 JSON object terminated by `\n`, flushed
/// immediately so callers watching the stream see events as they happen.
pub struct NdjsonSink<W: Write + Send> {
    writer: Mutex<W>,
    closed: AtomicBool,
}

impl<W: Write + Send> NdjsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        }
    }
}

impl<W: Write + Send> EventSink for NdjsonSink<W> {
    fn emit(&self, event: &ProgressEvent) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let Ok(json) = event.to_json() else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            // Write errors mean the caller hung up; the job carries on.
            let _ = writeln!(writer, "{}", json);
            let _ = writer.flush();
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Collects events in memory. For tests and embedding.
#[derive(Default)]
pub struct CollectorSink {
    events: Mutex<Vec<ProgressEvent>>,
    close_count: Mutex<usize>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// How many times `close` was called.
    pub fn close_count(&self) -> usize {
        self.close_count.lock().map(|c| *c).unwrap_or(0)
    }
}

impl EventSink for CollectorSink {
    fn emit(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn close(&self) {
        if let Ok(mut count) = self.close_count.lock() {
            *count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndjson_sink_writes_one_line_per_event() {
        let sink = NdjsonSink::new(Vec::new());
        sink.emit(&ProgressEvent::progress("step 1"));
        sink.emit(&ProgressEvent::Partial {
            text: "hello".to_string(),
        });

        let buffer = sink.writer.into_inner().unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"progress","message":"step 1"}"#);
        assert_eq!(lines[1], r#"{"type":"partial","text":"hello"}"#);
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn ndjson_sink_ignores_emit_after_close() {
        let sink = NdjsonSink::new(Vec::new());
        sink.emit(&ProgressEvent::progress("before"));
        sink.close();
        sink.emit(&ProgressEvent::progress("after"));

        let buffer = sink.writer.into_inner().unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("before"));
        assert!(!output.contains("after"));
    }

    #[test]
    fn ndjson_sink_close_is_idempotent() {
        let sink = NdjsonSink::new(Vec::new());
        sink.close();
        sink.close(); // must not panic or double-flush into trouble
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn ndjson_sink_swallows_write_errors() {
        let sink = NdjsonSink::new(FailingWriter);
        // Must not panic — closed transports are a normal condition.
        sink.emit(&ProgressEvent::progress("into the void"));
        sink.close();
    }

    #[test]
    fn collector_sink_records_in_order() {
        let sink = CollectorSink::new();
        sink.emit(&ProgressEvent::progress("a"));
        sink.emit(&ProgressEvent::progress("b"));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ProgressEvent::progress("a"));
        assert_eq!(events[1], ProgressEvent::progress("b"));
    }

    #[test]
    fn collector_sink_counts_closes() {
        let sink = CollectorSink::new();
        assert_eq!(sink.close_count(), 0);
        sink.close();
        assert_eq!(sink.close_count(), 1);
    }
}
