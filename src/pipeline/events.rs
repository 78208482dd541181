//! Progress event protocol streamed to the caller.
//!
//! One JSON object per event, newline-delimited, UTF-8. Tags are snake_case;
//! the chunk counters keep their original camelCase wire names for client
//! compatibility.

use serde::{Deserialize, Serialize};

/// Events emitted while a job runs.
///
/// Append-only and ordered. `Final` or `Error` terminates the stream exactly
/// once; no other kind repeats a fixed number of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Human-readable status line
    Progress { message: String },
    /// Total segment count, emitted once when segmentation occurred
    ChunkInfo {
        #[serde(rename = "totalChunks")]
        total_chunks: usize,
    },
    /// A segment's transcription is starting (1-based counter)
    ChunkStart {
        #[serde(rename = "currentChunk")]
        current_chunk: usize,
        #[serde(rename = "totalChunks")]
        total_chunks: usize,
        message: String,
    },
    /// A segment's transcription finished (1-based counter)
    ChunkComplete {
        #[serde(rename = "currentChunk")]
        current_chunk: usize,
        #[serde(rename = "totalChunks")]
        total_chunks: usize,
        message: String,
    },
    /// Current accumulator snapshot
    Partial { text: String },
    /// Completed (possibly translated) transcript — terminal
    Final { text: String },
    /// Failure message — terminal
    Error { message: String },
}

impl ProgressEvent {
    /// Shorthand for the most common event kind.
    pub fn progress(message: impl Into<String>) -> Self {
        Self::Progress {
            message: message.into(),
        }
    }

    /// Serialize event to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize event from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// True for the two terminal kinds.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Final { .. } | Self::Error { .. })
    }
}

/// Format elapsed wall-clock time as `Xm Ys`.
pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{}m {}s", total_secs / 60, total_secs % 60)
}
