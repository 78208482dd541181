//! Error types for mediascribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediascribeError {
    // Request validation errors (no artifacts exist yet on this path)
    #[error("{message}")]
    Validation { message: String },

    // External media tool errors (ffmpeg/ffprobe)
    #[error("Media tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    // Transcription/translation backend errors
    #[error("Backend request failed: {message}")]
    Backend { message: String },

    #[error("Transcription timed out after {seconds}s")]
    BackendTimeout { seconds: u64 },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, MediascribeError>;
