//! Bitrate reduction for oversized normalized audio.
//!
//! Runs only when the normalized artifact exceeds the configured size
//! threshold. The output stays in the canonical container and replaces the
//! input for every downstream stage.

use crate::error::{MediascribeError, Result};
use crate::media::normalizer::{exit_message, path_str};
use crate::media::unique_stem;
use crate::process::ProcessRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Compressor {
    runner: Arc<dyn ProcessRunner>,
    sample_rate: u32,
    bitrate: String,
}

impl Compressor {
    pub fn new(runner: Arc<dyn ProcessRunner>, sample_rate: u32, bitrate: &str) -> Self {
        Self {
            runner,
            sample_rate,
            bitrate: bitrate.to_string(),
        }
    }

    /// Target path for the compressed artifact of `input`.
    pub fn target_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        std::env::temp_dir().join(format!("{}.wav", unique_stem(&format!("{stem}-c"))))
    }

    /// Re-encode `input` at the reduced bitrate, writing to `output`.
    ///
    /// The codec is pinned to `adpcm_ima_wav` (4 bits per sample): the WAV
    /// muxer would otherwise pick `pcm_s16le`, whose rate is fixed by the
    /// sample format and ignores `-b:a` entirely.
    ///
    /// The caller must have registered `output` for cleanup before calling,
    /// and must use it in place of `input` for all subsequent stages.
    pub async fn compress(&self, input: &Path, output: &Path) -> Result<()> {
        let sample_rate = self.sample_rate.to_string();
        let args = [
            "-y",
            "-i",
            path_str(input)?,
            "-ac",
            "1",
            "-ar",
            &sample_rate,
            "-c:a",
            "adpcm_ima_wav",
            "-b:a",
            &self.bitrate,
            path_str(output)?,
        ];

        let out = self.runner.run("ffmpeg", &args).await?;
        if !out.success() {
            return Err(MediascribeError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: exit_message("compress", out.code, &out.stderr),
            });
        }
        Ok(())
    }
}
