//! Time-based splitting of canonical audio into ordered segments.

use crate::error::{MediascribeError, Result};
use crate::media::normalizer::{exit_message, path_str};
use crate::media::unique_stem;
use crate::process::ProcessRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Segmenter {
    runner: Arc<dyn ProcessRunner>,
}

impl Segmenter {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Job-private directory to hold segment files.
    pub fn target_dir(&self) -> PathBuf {
        std::env::temp_dir().join(unique_stem("chunks"))
    }

    /// Split `input` into consecutive stream-copied pieces of at most
    /// `segment_secs` each, written into `out_dir`.
    ///
    /// Returns the segment paths sorted lexicographically by filename, which
    /// equals chronological order because the names are zero-padded sequence
    /// numbers (`chunk000.wav`, `chunk001.wav`, ...). The caller must have
    /// registered `out_dir` for cleanup before calling.
    pub async fn segment(
        &self,
        input: &Path,
        out_dir: &Path,
        segment_secs: u64,
    ) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(out_dir).await?;

        let pattern = out_dir.join("chunk%03d.wav");
        let secs = segment_secs.to_string();
        let args = [
            "-y",
            "-i",
            path_str(input)?,
            "-f",
            "segment",
            "-segment_time",
            &secs,
            "-c",
            "copy",
            path_str(&pattern)?,
        ];

        let out = self.runner.run("ffmpeg", &args).await?;
        if !out.success() {
            return Err(MediascribeError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: exit_message("segment", out.code, &out.stderr),
            });
        }

        let mut segments = Vec::new();
        let mut entries = tokio::fs::read_dir(out_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("wav") {
                segments.push(path);
            }
        }
        segments.sort();
        Ok(segments)
    }
}
