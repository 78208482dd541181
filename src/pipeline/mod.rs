//! The transcription pipeline: events, artifacts, stages, orchestration.

pub mod artifacts;
pub mod events;
pub mod orchestrator;
pub mod sink;
pub mod transcribe;

pub use artifacts::ArtifactSet;
pub use events::{ProgressEvent, format_elapsed};
pub use orchestrator::{JobRequest, JobSource, Pipeline};
pub use sink::{CollectorSink, EventSink, NdjsonSink};
pub use transcribe::{TranscriptAccumulator, TranscriptionStage};
