//! Conversion of arbitrary input media to canonical audio.
//!
//! Canonical form is mono PCM WAV at the configured sample rate with any
//! video stream stripped. Everything downstream (compressor, segmenter,
//! backend upload) assumes this format.

use crate::error::{MediascribeError, Result};
use crate::media::unique_stem;
use crate::process::ProcessRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Normalizer {
    runner: Arc<dyn ProcessRunner>,
    sample_rate: u32,
}

impl Normalizer {
    pub fn new(runner: Arc<dyn ProcessRunner>, sample_rate: u32) -> Self {
        Self {
            runner,
            sample_rate,
        }
    }

    /// Target path for the normalized artifact of `input`.
    ///
    /// Lives in the system temp directory; the timestamped stem keeps
    /// concurrent jobs apart.
    pub fn target_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        std::env::temp_dir().join(format!("{}.wav", unique_stem(stem)))
    }

    /// Transcode `input` into canonical audio at `output`.
    ///
    /// Does not delete the input. The caller must have registered `output`
    /// for cleanup before calling.
    pub async fn normalize(&self, input: &Path, output: &Path) -> Result<()> {
        let sample_rate = self.sample_rate.to_string();
        let args = [
            "-y",
            "-i",
            path_str(input)?,
            "-vn",
            "-ac",
            "1",
            "-ar",
            &sample_rate,
            "-f",
            "wav",
            path_str(output)?,
        ];

        let out = self.runner.run("ffmpeg", &args).await?;
        if !out.success() {
            return Err(MediascribeError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: exit_message("transcode", out.code, &out.stderr),
            });
        }
        Ok(())
    }
}

/// Reject paths that are not valid UTF-8 rather than lossily mangling them.
pub(crate) fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| MediascribeError::Validation {
        message: format!("non-UTF-8 path: {}", path.display()),
    })
}

/// One-line failure description from an ffmpeg/ffprobe exit.
pub(crate) fn exit_message(operation: &str, code: i32, stderr: &str) -> String {
    let detail = stderr.lines().last().unwrap_or("").trim();
    if detail.is_empty() {
        format!("{operation} exited with code {code}")
    } else {
        format!("{operation} exited with code {code}: {detail}")
    }
}
