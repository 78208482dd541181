//! Media preprocessing stages: normalize, probe, compress, segment.
//!
//! Each stage drives ffmpeg/ffprobe through the `ProcessRunner` seam and
//! writes its output to a caller-chosen path, so the orchestrator can
//! register every artifact for cleanup before the tool runs.

pub mod compressor;
pub mod normalizer;
pub mod probe;
pub mod segmenter;

pub use compressor::Compressor;
pub use normalizer::Normalizer;
pub use probe::MediaProbe;
pub use segmenter::Segmenter;

use std::time::{SystemTime, UNIX_EPOCH};

/// Replace any character outside `[A-Za-z0-9.-]` with `_`.
///
/// Upload names are caller-controlled and end up in temp paths.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Unique filename stem: prefix plus a high-resolution timestamp.
///
/// Concurrent jobs share the system temp directory; the nanosecond clock is
/// what keeps their artifact paths from colliding.
pub(crate) fn unique_stem(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{prefix}-{nanos}")
}
