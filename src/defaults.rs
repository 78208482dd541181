//! Default configuration constants for mediascribe.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Canonical audio sample rate in Hz.
///
/// 16kHz mono is the standard input format for speech recognition backends
/// and keeps normalized artifacts small.
pub const SAMPLE_RATE: u32 = 16000;

/// Normalized file size above which the compressor runs, in bytes.
///
/// 25 MB stays under the transcription backend's request-size ceiling
/// with margin for multipart framing.
pub const COMPRESS_THRESHOLD_BYTES: u64 = 25 * 1024 * 1024;

/// Bitrate passed to the compressor re-encode.
pub const COMPRESS_BITRATE: &str = "64k";

/// Probed duration above which the audio is split into segments, in seconds.
///
/// Recordings at or under this length go to the backend as a single request.
/// The source revisions disagreed on this cutoff, so it is a config field.
pub const SEGMENT_THRESHOLD_SECS: f64 = 150.0;

/// Target length of each split segment, in seconds.
///
/// Independent from the decision threshold above: a 151s recording is split
/// into 120s + 31s pieces.
pub const SEGMENT_SECS: u64 = 120;

/// Upper bound on a single transcription request, in seconds.
///
/// A request past this bound counts as a failed segment (skip-and-continue).
pub const TRANSCRIBE_TIMEOUT_SECS: u64 = 180;

/// Interval between heartbeat progress events while transcription is in
/// flight, in seconds.
pub const HEARTBEAT_SECS: u64 = 5;

/// Minimum trimmed length for a segment transcription to be kept.
///
/// Anything shorter is noise or a fragment of a hallucination.
pub const MIN_TRANSCRIPT_CHARS: usize = 10;

/// Language value that means "let the backend detect the language".
pub const AUTO_LANGUAGE: &str = "auto";

/// Default language hint for transcription.
pub const DEFAULT_LANGUAGE: &str = AUTO_LANGUAGE;

/// Phrases the transcription backend emits for silent or non-speech input
/// instead of reporting "no speech detected".
///
/// Matched case-sensitively as substrings. Segment results containing any of
/// these are treated as empty contributions. Extendable via config.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "Subtitles by the Amara.org community",
    "Subtitles by Amara.org",
    "Thank you for watching",
    "Thanks for watching",
    "Please subscribe to my channel",
    "www.mooji.org",
    "Продолжение следует...",
    "Редактор субтитров",
];
