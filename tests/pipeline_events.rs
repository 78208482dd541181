//! End-to-end pipeline tests over mocked tools and backends.
//!
//! A fake process runner stands in for ffmpeg/ffprobe and actually creates
//! the artifact files the real tools would, so these tests exercise the full
//! job flow: staging, preprocessing decisions, ordered transcription events,
//! translation, and the cleanup postcondition.

use async_trait::async_trait;
use mediascribe::backend::{MockTranscriptionBackend, MockTranslationBackend};
use mediascribe::config::Config;
use mediascribe::error::Result;
use mediascribe::pipeline::sink::CollectorSink;
use mediascribe::pipeline::{JobRequest, JobSource, Pipeline, ProgressEvent};
use mediascribe::process::{ProcessOutput, ProcessRunner};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Fake ffmpeg/ffprobe that writes the files the real tools would.
///
/// Dispatch is on argument shape: `-b:a` marks the compressor re-encode,
/// `segment` the splitter, anything else the normalizer transcode. Every
/// path it creates is recorded so tests can assert the cleanup postcondition.
struct FakeMediaRunner {
    duration_secs: f64,
    normalized_bytes: usize,
    compressed_bytes: usize,
    segment_count: usize,
    created: Mutex<Vec<PathBuf>>,
    programs: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeMediaRunner {
    fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            normalized_bytes: 1024,
            compressed_bytes: 512,
            segment_count: 3,
            created: Mutex::new(Vec::new()),
            programs: Mutex::new(Vec::new()),
        }
    }

    fn with_normalized_bytes(mut self, bytes: usize) -> Self {
        self.normalized_bytes = bytes;
        self
    }

    fn with_segment_count(mut self, count: usize) -> Self {
        self.segment_count = count;
        self
    }

    fn created_paths(&self) -> Vec<PathBuf> {
        self.created.lock().unwrap().clone()
    }

    fn ffmpeg_calls_with(&self, flag: &str) -> usize {
        self.programs
            .lock()
            .unwrap()
            .iter()
            .filter(|(program, args)| program == "ffmpeg" && args.iter().any(|a| a == flag))
            .count()
    }

    fn record_created(&self, path: PathBuf) {
        self.created.lock().unwrap().push(path);
    }
}

#[async_trait]
impl ProcessRunner for FakeMediaRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput> {
        self.programs.lock().unwrap().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));

        let ok = |stdout: String| {
            Ok(ProcessOutput {
                code: 0,
                stdout,
                stderr: String::new(),
            })
        };

        match program {
            "ffprobe" => ok(format!("{}\n", self.duration_secs)),
            "ffmpeg" => {
                let output = PathBuf::from(args.last().copied().unwrap_or_default());
                if args.iter().any(|a| *a == "segment") {
                    // Output is a printf pattern; write the pieces next to it.
                    let dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
                    for i in 0..self.segment_count {
                        let piece = dir.join(format!("chunk{i:03}.wav"));
                        std::fs::write(&piece, b"RIFF fake segment").unwrap();
                        self.record_created(piece);
                    }
                    self.record_created(dir);
                } else if args.iter().any(|a| *a == "-b:a") {
                    std::fs::write(&output, vec![0u8; self.compressed_bytes]).unwrap();
                    self.record_created(output);
                } else {
                    std::fs::write(&output, vec![0u8; self.normalized_bytes]).unwrap();
                    self.record_created(output);
                }
                ok(String::new())
            }
            other => panic!("unexpected program: {other}"),
        }
    }
}

fn quick_config() -> Config {
    let mut config = Config::default();
    config.transcribe.heartbeat_secs = 0;
    config
}

fn input_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"fake media container").unwrap();
    path
}

fn all_removed(paths: &[PathBuf]) -> bool {
    paths.iter().all(|p| !p.exists())
}

fn terminal_events(sink: &CollectorSink) -> Vec<ProgressEvent> {
    sink.events()
        .into_iter()
        .filter(|e| e.is_terminal())
        .collect()
}

fn has_progress_containing(sink: &CollectorSink, needle: &str) -> bool {
    sink.events().iter().any(|e| {
        matches!(e, ProgressEvent::Progress { message } if message.contains(needle))
    })
}

#[tokio::test]
async fn short_recording_yields_single_final_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(&dir, "short-talk.mp4");

    let runner = Arc::new(FakeMediaRunner::new(100.0));
    let backend = Arc::new(
        MockTranscriptionBackend::new().with_response("the full spoken content of the recording"),
    );
    let sink = Arc::new(CollectorSink::new());

    let pipeline = Pipeline::new(
        quick_config(),
        runner.clone(),
        backend.clone(),
        Arc::new(MockTranslationBackend::new()),
        sink.clone(),
    );
    pipeline
        .run(JobRequest::new(JobSource::LocalFile(input.clone())))
        .await;

    // Exactly one terminal event, and it is the transcript.
    assert_eq!(
        terminal_events(&sink),
        vec![ProgressEvent::Final {
            text: "the full spoken content of the recording".to_string()
        }]
    );

    // Short recordings are never chunked.
    assert!(!sink.events().iter().any(|e| matches!(
        e,
        ProgressEvent::ChunkInfo { .. } | ProgressEvent::ChunkStart { .. }
    )));

    // Stage progress narration in order of appearance.
    assert!(has_progress_containing(&sink, "Converting to WAV..."));
    assert!(has_progress_containing(&sink, "Transcribing speech..."));
    assert!(has_progress_containing(&sink, "Done ("));

    // The whole recording went to the backend with no language hint.
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, None);

    // Every artifact the tools produced is gone; the input survives.
    assert!(all_removed(&runner.created_paths()));
    assert!(input.exists());
    assert_eq!(sink.close_count(), 1);
}

#[tokio::test]
async fn long_recording_is_chunked_and_survives_one_failed_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(&dir, "lecture.mp4");

    let runner = Arc::new(FakeMediaRunner::new(400.0).with_segment_count(3));
    let backend = Arc::new(
        MockTranscriptionBackend::new()
            .with_response("content of the first chunk.")
            .with_failure("connection reset by peer")
            .with_response("content of the third chunk."),
    );
    let sink = Arc::new(CollectorSink::new());

    let pipeline = Pipeline::new(
        quick_config(),
        runner.clone(),
        backend.clone(),
        Arc::new(MockTranslationBackend::new()),
        sink.clone(),
    );
    pipeline
        .run(JobRequest::new(JobSource::LocalFile(input)))
        .await;

    let events = sink.events();

    // Chunk bookkeeping: one chunk_info, then start/complete pairs in order.
    assert!(events.contains(&ProgressEvent::ChunkInfo { total_chunks: 3 }));
    let starts: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::ChunkStart { current_chunk, .. } => Some(*current_chunk),
            _ => None,
        })
        .collect();
    assert_eq!(starts, vec![1, 2, 3]);

    // The failed chunk is narrated, not fatal: the final transcript is the
    // concatenation of the surviving chunks in order.
    assert!(has_progress_containing(&sink, "Chunk 2/3 skipped"));
    assert_eq!(
        terminal_events(&sink),
        vec![ProgressEvent::Final {
            text: "content of the first chunk. content of the third chunk.".to_string()
        }]
    );

    // Chunks were transcribed in chronological (filename) order.
    let paths: Vec<String> = backend
        .calls()
        .iter()
        .map(|(p, _)| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(paths, vec!["chunk000.wav", "chunk001.wav", "chunk002.wav"]);

    // Last partial snapshot equals the final transcript.
    let last_partial = events
        .iter()
        .rev()
        .find_map(|e| match e {
            ProgressEvent::Partial { text } => Some(text.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        last_partial,
        "content of the first chunk. content of the third chunk."
    );

    assert!(all_removed(&runner.created_paths()));
    assert_eq!(sink.close_count(), 1);
}

#[tokio::test]
async fn oversized_normalized_audio_is_compressed_first() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(&dir, "podcast.mp3");

    let mut config = quick_config();
    config.media.compress_threshold_mb = 1;

    // 2 MiB normalized output crosses the 1 MB test threshold.
    let runner = Arc::new(FakeMediaRunner::new(100.0).with_normalized_bytes(2 * 1024 * 1024));
    let sink = Arc::new(CollectorSink::new());

    let pipeline = Pipeline::new(
        config,
        runner.clone(),
        Arc::new(MockTranscriptionBackend::new().with_response("spoken words from the podcast")),
        Arc::new(MockTranslationBackend::new()),
        sink.clone(),
    );
    pipeline
        .run(JobRequest::new(JobSource::LocalFile(input)))
        .await;

    assert_eq!(runner.ffmpeg_calls_with("-b:a"), 1);
    assert!(has_progress_containing(&sink, "Compressing audio"));
    assert_eq!(terminal_events(&sink).len(), 1);
    assert!(all_removed(&runner.created_paths()));
}

#[tokio::test]
async fn small_audio_skips_compression() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(&dir, "memo.m4a");

    let runner = Arc::new(FakeMediaRunner::new(30.0));
    let sink = Arc::new(CollectorSink::new());

    let pipeline = Pipeline::new(
        quick_config(),
        runner.clone(),
        Arc::new(MockTranscriptionBackend::new().with_response("a short voice memo transcript")),
        Arc::new(MockTranslationBackend::new()),
        sink.clone(),
    );
    pipeline
        .run(JobRequest::new(JobSource::LocalFile(input)))
        .await;

    assert_eq!(runner.ffmpeg_calls_with("-b:a"), 0);
    assert!(!has_progress_containing(&sink, "Compressing audio"));
    assert_eq!(terminal_events(&sink).len(), 1);
}

#[tokio::test]
async fn translation_is_applied_to_the_final_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(&dir, "vortrag.mp4");

    let runner = Arc::new(FakeMediaRunner::new(100.0));
    let translation = Arc::new(MockTranslationBackend::new());
    let sink = Arc::new(CollectorSink::new());

    let pipeline = Pipeline::new(
        quick_config(),
        runner,
        Arc::new(MockTranscriptionBackend::new().with_response("der gesprochene deutsche Text")),
        translation.clone(),
        sink.clone(),
    );
    pipeline
        .run(
            JobRequest::new(JobSource::LocalFile(input))
                .with_language("de")
                .with_translation("English"),
        )
        .await;

    assert!(has_progress_containing(&sink, "Translating text..."));
    assert_eq!(
        terminal_events(&sink),
        vec![ProgressEvent::Final {
            text: "translated: der gesprochene deutsche Text".to_string()
        }]
    );
    assert_eq!(
        translation.calls(),
        vec![(
            "der gesprochene deutsche Text".to_string(),
            "English".to_string()
        )]
    );
}

#[tokio::test]
async fn translation_failure_aborts_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(&dir, "talk.mp4");

    let runner = Arc::new(FakeMediaRunner::new(100.0));
    let sink = Arc::new(CollectorSink::new());

    let pipeline = Pipeline::new(
        quick_config(),
        runner.clone(),
        Arc::new(MockTranscriptionBackend::new().with_response("perfectly good transcript text")),
        Arc::new(MockTranslationBackend::new().with_failure()),
        sink.clone(),
    );
    pipeline
        .run(
            JobRequest::new(JobSource::LocalFile(input)).with_translation("English"),
        )
        .await;

    // Unlike a per-chunk transcription failure, a failed translation is
    // all-or-nothing: one error event, no final.
    let terminals = terminal_events(&sink);
    assert_eq!(terminals.len(), 1);
    assert!(matches!(&terminals[0], ProgressEvent::Error { .. }));

    // Cleanup still ran on the error path.
    assert!(all_removed(&runner.created_paths()));
    assert_eq!(sink.close_count(), 1);
}

#[tokio::test]
async fn boilerplate_only_transcript_still_ends_with_a_final_event() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(&dir, "silence.mp4");

    let runner = Arc::new(FakeMediaRunner::new(100.0));
    let sink = Arc::new(CollectorSink::new());

    let pipeline = Pipeline::new(
        quick_config(),
        runner.clone(),
        Arc::new(MockTranscriptionBackend::new().with_response("Thank you for watching")),
        Arc::new(MockTranslationBackend::new()),
        sink.clone(),
    );
    pipeline
        .run(JobRequest::new(JobSource::LocalFile(input)))
        .await;

    // A fully filtered transcript is still a successful job: the caller gets
    // exactly one terminal event, a final with empty text, never silence.
    assert_eq!(
        terminal_events(&sink),
        vec![ProgressEvent::Final {
            text: String::new()
        }]
    );
    assert!(has_progress_containing(&sink, "Done ("));
    assert!(all_removed(&runner.created_paths()));
    assert_eq!(sink.close_count(), 1);
}
