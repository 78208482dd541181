//! mediascribe - Chunked audio/video transcription pipeline
//!
//! Upload-to-transcript processing with streaming NDJSON progress events.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod backend;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod media;
pub mod pipeline;
pub mod process;

// Core seams (run tools → transcribe → emit events)
pub use backend::{OpenAiBackend, TranscriptionBackend, TranslationBackend};
pub use pipeline::sink::{CollectorSink, EventSink, NdjsonSink};
pub use process::{ProcessRunner, SystemProcessRunner};

// Pipeline
pub use pipeline::orchestrator::{JobRequest, JobSource, Pipeline};

// Error handling
pub use error::{MediascribeError, Result};

// Config
pub use config::{Config, resolve_boilerplate_filters};

// Events
pub use pipeline::events::ProgressEvent;

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
