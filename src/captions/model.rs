use crate::foundation::error::{ReelError, ReelResult};

/// A timed span of on-screen text. Bounds are inclusive on both ends.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionSegment {
    /// Display start in seconds, `>= 0`.
    pub start: f64,
    /// Display end in seconds, `> start`.
    pub end: f64,
    /// Text to draw, non-empty.
    pub text: String,
}

impl CaptionSegment {
    /// Build a segment without validating it.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Segment length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// `true` when `t` lies in `[start, end]`.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Check a caption batch before any rendering work: non-empty, finite, `0 <= start < end`,
/// non-blank text. Errors name the offending segment index.
pub fn validate_captions(captions: &[CaptionSegment]) -> ReelResult<()> {
    if captions.is_empty() {
        return Err(ReelError::validation("caption list cannot be empty"));
    }
    for (i, seg) in captions.iter().enumerate() {
        if !seg.start.is_finite() || !seg.end.is_finite() {
            return Err(ReelError::validation(format!(
                "caption {i} has non-finite timing"
            )));
        }
        if seg.start < 0.0 {
            return Err(ReelError::validation(format!(
                "caption {i} starts before 0s ({})",
                seg.start
            )));
        }
        if seg.start >= seg.end {
            return Err(ReelError::validation(format!(
                "invalid timing in caption {i}: start >= end ({} >= {})",
                seg.start, seg.end
            )));
        }
        if seg.text.trim().is_empty() {
            return Err(ReelError::validation(format!("caption {i} has empty text")));
        }
    }
    Ok(())
}

/// Latest caption end, or `None` for an empty list.
pub fn max_caption_end(captions: &[CaptionSegment]) -> Option<f64> {
    captions
        .iter()
        .map(|c| c.end)
        .filter(|e| e.is_finite())
        .fold(None, |acc: Option<f64>, e| Some(acc.map_or(e, |a| a.max(e))))
}

#[cfg(test)]
#[path = "../../tests/unit/captions/model.rs"]
mod tests;
