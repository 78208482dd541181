//! Heuristic filter for bad transcription output.
//!
//! Transcription backends sometimes answer silent or non-speech audio with a
//! stock disclaimer sentence instead of reporting "no speech detected".
//! Treating those results (and anything too short to be speech) as empty
//! contributions keeps them out of the transcript.

use crate::defaults;

pub struct OutputFilter {
    min_chars: usize,
    boilerplate: Vec<String>,
}

impl Default for OutputFilter {
    fn default() -> Self {
        Self::new(
            defaults::MIN_TRANSCRIPT_CHARS,
            defaults::BOILERPLATE_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        )
    }
}

impl OutputFilter {
    pub fn new(min_chars: usize, boilerplate: Vec<String>) -> Self {
        Self {
            min_chars,
            boilerplate,
        }
    }

    /// Apply the filter to a raw segment result.
    ///
    /// Returns the trimmed text when it passes, `None` when the segment
    /// should contribute nothing. Rejection reasons: trimmed length below
    /// the minimum, or a case-sensitive substring match against any known
    /// boilerplate phrase.
    pub fn apply(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < self.min_chars {
            return None;
        }
        if self.boilerplate.iter().any(|p| trimmed.contains(p.as_str())) {
            return None;
        }
        Some(trimmed.to_string())
    }
}
