//! Command-line interface for mediascribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chunked audio/video transcription with streaming NDJSON progress
#[derive(Parser, Debug)]
#[command(
    name = "mediascribe",
    version,
    about = "Transcribe audio/video files, streaming NDJSON progress to stdout"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Audio or video file to transcribe
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Language hint for transcription (default: auto-detect). Examples: auto, en, de, es, fr
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Translate the transcript into this language (e.g., English, German)
    #[arg(long, value_name = "LANG")]
    pub translate_to: Option<String>,

    /// Transcription engine (currently only: openai)
    #[arg(long, value_name = "ENGINE", default_value = "openai")]
    pub engine: String,

    /// Segment length for long recordings (default: 2m). Examples: 90s, 2m, 5m
    #[arg(long, value_name = "DURATION", value_parser = parse_segment_secs)]
    pub segment_secs: Option<u64>,
}

/// Parse a segment duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`90s`, `2m`), and compound (`1m30s`).
fn parse_segment_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        if secs == 0 {
            return Err("segment length must be positive".to_string());
        }
        return Ok(secs);
    }
    let secs = humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("segment length must be positive".to_string());
    }
    Ok(secs)
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system dependencies (ffmpeg, ffprobe, API credentials)
    Check,
}
