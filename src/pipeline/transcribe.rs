//! Transcription stage: ordered, sequential, best-effort per segment.
//!
//! Segments are chronological slices of one recording, so they are processed
//! strictly in index order and never concurrently — concurrency would also
//! multiplex the backend's per-connection rate budget across one job.

use crate::backend::TranscriptionBackend;
use crate::defaults;
use crate::error::MediascribeError;
use crate::filter::OutputFilter;
use crate::pipeline::events::{ProgressEvent, format_elapsed};
use crate::pipeline::sink::EventSink;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Accumulated transcript of one job.
///
/// Owned by the transcription stage for the job's duration. Non-empty
/// contributions are joined by exactly one space; skipped segments
/// contribute nothing, not even a separator.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    text: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contribution, inserting a separator only between two
    /// non-empty pieces.
    pub fn push(&mut self, contribution: &str) {
        if contribution.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(contribution);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Cancels the heartbeat task when dropped.
///
/// Tied to the transcription stage's scope so the timer cannot outlive it on
/// any exit path — success, per-segment failure, or job abort.
struct HeartbeatGuard {
    handle: Option<JoinHandle<()>>,
}

impl HeartbeatGuard {
    fn spawn(sink: Arc<dyn EventSink>, started: Instant, every: Duration) -> Self {
        if every.is_zero() {
            return Self { handle: None };
        }
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                sink.emit(&ProgressEvent::progress(format!(
                    "Transcribing... ({})",
                    format_elapsed(started.elapsed())
                )));
            }
        });
        Self {
            handle: Some(handle),
        }
    }
}

impl Drop for HeartbeatGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub struct TranscriptionStage {
    backend: Arc<dyn TranscriptionBackend>,
    filter: OutputFilter,
    timeout: Duration,
    heartbeat: Duration,
}

impl TranscriptionStage {
    pub fn new(backend: Arc<dyn TranscriptionBackend>, filter: OutputFilter) -> Self {
        Self {
            backend,
            filter,
            timeout: Duration::from_secs(defaults::TRANSCRIBE_TIMEOUT_SECS),
            heartbeat: Duration::from_secs(defaults::HEARTBEAT_SECS),
        }
    }

    /// Upper bound on a single transcription request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Heartbeat interval; zero disables the heartbeat.
    pub fn with_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    /// Transcribe `segments` in order and return the accumulated text.
    ///
    /// A failed or timed-out segment is skipped with a `progress` note; the
    /// job continues. Partial transcripts beat all-or-nothing failure on
    /// long recordings, so there is no retry and no abort here.
    pub async fn run(
        &self,
        segments: &[PathBuf],
        language: &str,
        sink: Arc<dyn EventSink>,
        job_started: Instant,
    ) -> String {
        let total = segments.len();
        let multi = total > 1;
        let hint = language_hint(language);
        let mut accumulator = TranscriptAccumulator::new();

        let _heartbeat = HeartbeatGuard::spawn(sink.clone(), job_started, self.heartbeat);

        for (index, segment) in segments.iter().enumerate() {
            let current = index + 1;
            if multi {
                sink.emit(&ProgressEvent::ChunkStart {
                    current_chunk: current,
                    total_chunks: total,
                    message: format!("Processing chunk {current}/{total}"),
                });
            }

            let attempt = tokio::time::timeout(self.timeout, self.backend.transcribe(segment, hint))
                .await
                .unwrap_or(Err(MediascribeError::BackendTimeout {
                    seconds: self.timeout.as_secs(),
                }));

            match attempt {
                Ok(raw) => {
                    if let Some(text) = self.filter.apply(&raw) {
                        accumulator.push(&text);
                    }
                }
                Err(e) => {
                    sink.emit(&ProgressEvent::progress(format!(
                        "Chunk {current}/{total} skipped: {e}"
                    )));
                }
            }

            if multi {
                sink.emit(&ProgressEvent::ChunkComplete {
                    current_chunk: current,
                    total_chunks: total,
                    message: format!("Chunk {current}/{total} done"),
                });
            }

            // Always emitted, even for empty contributions — liveness.
            sink.emit(&ProgressEvent::Partial {
                text: accumulator.text().to_string(),
            });
        }

        accumulator.into_text()
    }
}

/// Map the "auto" sentinel to "no hint" for the backend.
fn language_hint(language: &str) -> Option<&str> {
    if language.is_empty() || language == defaults::AUTO_LANGUAGE {
        None
    } else {
        Some(language)
    }
}
