//! Job orchestration: one linear pipeline from upload to final transcript.
//!
//! Stage order is Received → Normalizing → (Compressing) → Probing →
//! (Segmenting) → Transcribing → (Translating) → Finalizing. Every stage
//! entry emits a progress event; any stage error jumps straight to the
//! failure path. Cleanup runs unconditionally and the event stream is closed
//! exactly once, on every path.

use crate::backend::{TranscriptionBackend, TranslationBackend};
use crate::config::{Config, resolve_boilerplate_filters};
use crate::error::{MediascribeError, Result};
use crate::filter::OutputFilter;
use crate::media::{Compressor, MediaProbe, Normalizer, Segmenter, sanitize_file_name};
use crate::pipeline::artifacts::ArtifactSet;
use crate::pipeline::events::{ProgressEvent, format_elapsed};
use crate::pipeline::sink::EventSink;
use crate::pipeline::transcribe::TranscriptionStage;
use crate::process::ProcessRunner;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where the job's media comes from.
#[derive(Debug, Clone)]
pub enum JobSource {
    /// Uploaded bytes plus the caller-supplied file name. Saved to transient
    /// storage and deleted with the other artifacts at job end.
    Upload { data: Vec<u8>, file_name: String },
    /// Existing file on disk (CLI use). Used in place, never deleted.
    LocalFile(PathBuf),
    /// The request carried no file.
    Missing,
}

/// One invocation of the pipeline for one uploaded file.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub source: JobSource,
    /// Language hint for transcription ("auto" = backend detects)
    pub language: String,
    /// Target translation language; empty = no translation
    pub translate_to: String,
}

impl JobRequest {
    pub fn new(source: JobSource) -> Self {
        Self {
            source,
            language: crate::defaults::DEFAULT_LANGUAGE.to_string(),
            translate_to: String::new(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_translation(mut self, target: &str) -> Self {
        self.translate_to = target.to_string();
        self
    }
}

/// Media transcription pipeline.
///
/// Holds the external capabilities (process runner, backends, event sink);
/// each `run` call processes one independent job. Jobs share nothing, so a
/// `Pipeline` can be cloned behind an `Arc` and run concurrently.
pub struct Pipeline {
    config: Config,
    runner: Arc<dyn ProcessRunner>,
    transcription: Arc<dyn TranscriptionBackend>,
    translation: Arc<dyn TranslationBackend>,
    sink: Arc<dyn EventSink>,
}

impl Pipeline {
    pub fn new(
        config: Config,
        runner: Arc<dyn ProcessRunner>,
        transcription: Arc<dyn TranscriptionBackend>,
        translation: Arc<dyn TranslationBackend>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            runner,
            transcription,
            translation,
            sink,
        }
    }

    /// Run one job to completion.
    ///
    /// Never returns an error: every outcome is reported through the event
    /// stream, which always ends with exactly one `final` or `error` event
    /// and is closed after cleanup.
    pub async fn run(&self, request: JobRequest) {
        let started = Instant::now();
        let mut artifacts = ArtifactSet::new();

        match self.execute(&request, &mut artifacts, started).await {
            Ok(text) => {
                // Emitted even when every segment was filtered out: callers
                // key on the terminal event, not on the progress chatter, so
                // success must always surface a `final` (possibly empty).
                self.sink.emit(&ProgressEvent::Final { text });
                self.sink.emit(&ProgressEvent::progress(format!(
                    "Done ({})",
                    format_elapsed(started.elapsed())
                )));
            }
            Err(e) => {
                self.sink.emit(&ProgressEvent::Error {
                    message: e.to_string(),
                });
            }
        }

        artifacts.cleanup().await;
        self.sink.close();
    }

    async fn execute(
        &self,
        request: &JobRequest,
        artifacts: &mut ArtifactSet,
        started: Instant,
    ) -> Result<String> {
        self.sink
            .emit(&ProgressEvent::progress("Preparing file..."));

        let input = self.stage_input(&request.source, artifacts).await?;

        // Normalizing
        self.sink
            .emit(&ProgressEvent::progress("Converting to WAV..."));
        let normalizer = Normalizer::new(self.runner.clone(), self.config.media.sample_rate);
        let normalized = normalizer.target_path(&input);
        artifacts.register(&normalized);
        normalizer.normalize(&input, &normalized).await?;

        // Compressing (only when the normalized stream is oversized)
        let mut audio = normalized;
        let size = tokio::fs::metadata(&audio).await?.len();
        if size > self.config.compress_threshold_bytes() {
            let size_mb = size as f64 / (1024.0 * 1024.0);
            self.sink.emit(&ProgressEvent::progress(format!(
                "Compressing audio ({size_mb:.1} MB)..."
            )));
            let compressor = Compressor::new(
                self.runner.clone(),
                self.config.media.sample_rate,
                &self.config.media.compress_bitrate,
            );
            let compressed = compressor.target_path(&audio);
            artifacts.register(&compressed);
            compressor.compress(&audio, &compressed).await?;
            audio = compressed;
        }

        // Probing
        let probe = MediaProbe::new(self.runner.clone());
        let duration = probe.duration(&audio).await?;

        // Segmenting (only for long recordings); otherwise the whole audio
        // is the single element of the segment list.
        let segments = if duration > self.config.media.segment_threshold_secs {
            self.sink.emit(&ProgressEvent::progress(format!(
                "Splitting into chunks ({} minutes)...",
                (duration / 60.0).floor() as u64
            )));
            let segmenter = Segmenter::new(self.runner.clone());
            let dir = segmenter.target_dir();
            artifacts.register_dir(&dir);
            let segments = segmenter
                .segment(&audio, &dir, self.config.media.segment_secs)
                .await?;
            for segment in &segments {
                artifacts.register(segment);
            }
            segments
        } else {
            vec![audio]
        };

        if segments.len() > 1 {
            self.sink.emit(&ProgressEvent::ChunkInfo {
                total_chunks: segments.len(),
            });
        }

        // Transcribing
        self.sink
            .emit(&ProgressEvent::progress("Transcribing speech..."));
        let filter = OutputFilter::new(
            self.config.transcribe.min_chars,
            resolve_boilerplate_filters(&self.config.transcribe.extra_boilerplate),
        );
        let stage = TranscriptionStage::new(self.transcription.clone(), filter)
            .with_timeout(Duration::from_secs(self.config.transcribe.timeout_secs))
            .with_heartbeat(Duration::from_secs(self.config.transcribe.heartbeat_secs));
        let mut text = stage
            .run(&segments, &request.language, self.sink.clone(), started)
            .await;

        // Translating — all-or-nothing over validated text, so unlike a
        // per-segment transcription failure this one aborts the job.
        if !request.translate_to.trim().is_empty() {
            self.sink
                .emit(&ProgressEvent::progress("Translating text..."));
            text = self
                .translation
                .translate(&text, &request.translate_to)
                .await?;
        }

        Ok(text)
    }

    /// Resolve the job source to a readable path, saving uploads to
    /// transient storage.
    async fn stage_input(
        &self,
        source: &JobSource,
        artifacts: &mut ArtifactSet,
    ) -> Result<PathBuf> {
        match source {
            JobSource::Upload { data, file_name } => {
                let safe = sanitize_file_name(file_name);
                let path = std::env::temp_dir().join(crate::media::unique_stem(&safe));
                artifacts.register(&path);
                tokio::fs::write(&path, data).await?;
                Ok(path)
            }
            JobSource::LocalFile(path) => {
                if tokio::fs::metadata(path).await.is_ok() {
                    Ok(path.clone())
                } else {
                    Err(MediascribeError::Validation {
                        message: format!("Input file not found: {}", path.display()),
                    })
                }
            }
            JobSource::Missing => Err(MediascribeError::Validation {
                message: "No file provided".to_string(),
            }),
        }
    }
}
