//! Transcription and translation backends.
//!
//! The pipeline only sees the two capability traits; the OpenAI
//! implementation is the default (and currently only) engine.

pub mod api;
pub mod openai;

pub use api::{
    MockTranscriptionBackend, MockTranslationBackend, TranscriptionBackend, TranslationBackend,
};
pub use openai::OpenAiBackend;
