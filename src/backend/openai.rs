//! OpenAI-backed transcription and translation.
//!
//! Transcription uploads the segment audio to `audio/transcriptions`
//! (whisper-1); translation is one `chat/completions` call (gpt-4o-mini)
//! over the full accumulated text. The API key is read from the environment
//! at construction but not validated — a missing key fails at request time
//! as a backend error, like any other credential problem.

use crate::defaults;
use crate::error::{MediascribeError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const TRANSCRIPTION_MODEL: &str = "whisper-1";
const TRANSLATION_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiBackend {
    /// Build a backend with the key from `OPENAI_API_KEY`.
    ///
    /// An absent key is not an error here; requests will fail with 401.
    pub fn from_env() -> Self {
        Self::new(&std::env::var("OPENAI_API_KEY").unwrap_or_default())
    }

    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the backend at a non-default API host (tests, proxies).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        // Request timeout is enforced per-call by the pipeline; the client
        // bound below is a backstop for connection-level hangs.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                defaults::TRANSCRIBE_TIMEOUT_SECS + 30,
            ))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn backend_err(context: &str, e: impl std::fmt::Display) -> MediascribeError {
        MediascribeError::Backend {
            message: format!("{context}: {e}"),
        }
    }

    async fn check_status(context: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = body.lines().next().unwrap_or("").trim();
        Err(MediascribeError::Backend {
            message: if detail.is_empty() {
                format!("{context}: HTTP {status}")
            } else {
                format!("{context}: HTTP {status}: {detail}")
            },
        })
    }
}

#[async_trait]
impl crate::backend::TranscriptionBackend for OpenAiBackend {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String> {
        let audio = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let file_part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| Self::backend_err("transcription upload", e))?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", file_part);
        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::backend_err("transcription request", e))?;

        let response = Self::check_status("transcription request", response).await?;
        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Self::backend_err("transcription response", e))?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl crate::backend::TranslationBackend for OpenAiBackend {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": TRANSLATION_MODEL,
            "temperature": 0,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "Translate the following text to {target_language}. \
                         Return only the translated text."
                    ),
                },
                { "role": "user", "content": text },
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::backend_err("translation request", e))?;

        let response = Self::check_status("translation request", response).await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Self::backend_err("translation response", e))?;

        // An empty completion falls back to the untranslated text rather
        // than erasing the transcript.
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| text.to_string()))
    }
}
