//! Duration inspection of normalized audio.

use crate::error::{MediascribeError, Result};
use crate::media::normalizer::{exit_message, path_str};
use crate::process::ProcessRunner;
use std::path::Path;
use std::sync::Arc;

pub struct MediaProbe {
    runner: Arc<dyn ProcessRunner>,
}

impl MediaProbe {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Probed duration of `audio_path` in seconds.
    ///
    /// Unparseable probe output yields `0.0` instead of an error: duration
    /// only feeds the segmentation heuristic, and a safe default beats
    /// aborting the whole job. A probe process that cannot run or exits
    /// non-zero is still a `ToolFailed`/`ToolNotFound` error.
    pub async fn duration(&self, audio_path: &Path) -> Result<f64> {
        let args = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            path_str(audio_path)?,
        ];

        let out = self.runner.run("ffprobe", &args).await?;
        if !out.success() {
            return Err(MediascribeError::ToolFailed {
                tool: "ffprobe".to_string(),
                message: exit_message("probe", out.code, &out.stderr),
            });
        }

        let duration = out.stdout.trim().parse::<f64>().unwrap_or(0.0);
        if duration.is_finite() && duration >= 0.0 {
            Ok(duration)
        } else {
            Ok(0.0)
        }
    }
}
