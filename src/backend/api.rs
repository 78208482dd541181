//! Backend capability traits.
//!
//! These traits allow swapping implementations (real HTTP backend vs mock).

use crate::error::{MediascribeError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Trait for speech-to-text over one audio file.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Transcribe the audio at `audio_path`.
    ///
    /// # Arguments
    /// * `audio_path` - Canonical mono 16kHz audio file
    /// * `language` - Language hint, or `None` to let the backend detect
    ///
    /// # Returns
    /// Transcribed text or error
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String>;
}

/// Trait for text translation.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` into `target_language` in a single request.
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

/// Mock transcription backend for testing.
///
/// Responses are consumed in FIFO order, one per call; an exhausted queue
/// returns the default response. Calls are recorded with their arguments.
pub struct MockTranscriptionBackend {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(PathBuf, Option<String>)>>,
}

impl Default for MockTranscriptionBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscriptionBackend {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response for the next unanswered call.
    pub fn with_response(self, text: &str) -> Self {
        self.push(Ok(text.to_string()));
        self
    }

    /// Queue a failure for the next unanswered call.
    pub fn with_failure(self, message: &str) -> Self {
        self.push(Err(MediascribeError::Backend {
            message: message.to_string(),
        }));
        self
    }

    fn push(&self, response: Result<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    /// Arguments of every call made so far, in order.
    pub fn calls(&self) -> Vec<(PathBuf, Option<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranscriptionBackend for MockTranscriptionBackend {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((audio_path.to_path_buf(), language.map(|l| l.to_string())));
        }
        let queued = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front());
        match queued {
            Some(response) => response,
            None => Ok("mock transcription".to_string()),
        }
    }
}

/// Mock translation backend for testing.
pub struct MockTranslationBackend {
    prefix: String,
    should_fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl Default for MockTranslationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranslationBackend {
    pub fn new() -> Self {
        Self {
            prefix: "translated: ".to_string(),
            should_fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Configure the mock to fail on translate.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Arguments of every call made so far, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranslationBackend for MockTranslationBackend {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((text.to_string(), target_language.to_string()));
        }
        if self.should_fail {
            Err(MediascribeError::Backend {
                message: "mock translation failure".to_string(),
            })
        } else {
            Ok(format!("{}{}", self.prefix, text))
        }
    }
}
