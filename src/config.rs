use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub media: MediaConfig,
    pub transcribe: TranscribeConfig,
}

/// Media preprocessing configuration (normalize/compress/segment thresholds)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaConfig {
    /// Canonical sample rate for normalized audio
    pub sample_rate: u32,
    /// Normalized file size above which the compressor runs, in megabytes
    pub compress_threshold_mb: u64,
    /// Bitrate for the compressor re-encode (ffmpeg -b:a syntax)
    pub compress_bitrate: String,
    /// Probed duration above which the audio is segmented, in seconds
    pub segment_threshold_secs: f64,
    /// Target length of each segment, in seconds
    pub segment_secs: u64,
}

/// Transcription stage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscribeConfig {
    /// Language hint for the backend ("auto" = let the backend detect)
    pub language: String,
    /// Minimum trimmed length for a segment result to be kept
    pub min_chars: usize,
    /// Upper bound on a single transcription request, in seconds
    pub timeout_secs: u64,
    /// Seconds between heartbeat progress events during transcription
    pub heartbeat_secs: u64,
    /// Extra boilerplate phrases to filter, merged with the built-in list
    pub extra_boilerplate: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            compress_threshold_mb: defaults::COMPRESS_THRESHOLD_BYTES / (1024 * 1024),
            compress_bitrate: defaults::COMPRESS_BITRATE.to_string(),
            segment_threshold_secs: defaults::SEGMENT_THRESHOLD_SECS,
            segment_secs: defaults::SEGMENT_SECS,
        }
    }
}

impl Default for TranscribeConfig {
    fn default() -> Self {
        Self {
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            min_chars: defaults::MIN_TRANSCRIPT_CHARS,
            timeout_secs: defaults::TRANSCRIBE_TIMEOUT_SECS,
            heartbeat_secs: defaults::HEARTBEAT_SECS,
            extra_boilerplate: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - MEDIASCRIBE_LANGUAGE → transcribe.language
    /// - MEDIASCRIBE_SEGMENT_SECS → media.segment_secs
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("MEDIASCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.transcribe.language = language;
        }

        if let Ok(secs) = std::env::var("MEDIASCRIBE_SEGMENT_SECS")
            && let Ok(parsed) = secs.parse::<u64>()
            && parsed > 0
        {
            self.media.segment_secs = parsed;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/mediascribe/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("mediascribe")
            .join("config.toml")
    }

    /// Compress threshold in bytes (config stores megabytes).
    pub fn compress_threshold_bytes(&self) -> u64 {
        self.media.compress_threshold_mb * 1024 * 1024
    }
}

/// Merge the built-in boilerplate phrase list with user additions.
///
/// User phrases are appended after the built-ins; duplicates are dropped.
/// Matching elsewhere is case-sensitive, so phrases are kept verbatim.
pub fn resolve_boilerplate_filters(extra: &[String]) -> Vec<String> {
    let mut phrases: Vec<String> = defaults::BOILERPLATE_PHRASES
        .iter()
        .map(|p| p.to_string())
        .collect();
    for phrase in extra {
        if !phrase.is_empty() && !phrases.iter().any(|p| p == phrase) {
            phrases.push(phrase.clone());
        }
    }
    phrases
}
