//! Adapter from transcription payloads to [`CaptionSegment`]s.
//!
//! Transcription services return loosely shaped JSON (objects or dicts, `words` or
//! `word_timings`, numbers or numeric strings). [`TranscriptTiming::from_json`] is the only
//! place that tolerates those variations; everything downstream sees fixed records.

use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use crate::captions::model::CaptionSegment;
use crate::foundation::error::{ReelError, ReelResult};

/// Default caption grouping: consecutive transcribed words per caption.
pub const DEFAULT_WORDS_PER_CAPTION: usize = 4;

/// One transcribed word.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordTiming {
    /// Word text, trimmed.
    pub word: String,
    /// Start in seconds.
    pub start: f64,
    /// End in seconds.
    pub end: f64,
}

/// One sentence-level transcription segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentTiming {
    /// Segment text, trimmed.
    pub text: String,
    /// Start in seconds.
    pub start: f64,
    /// End in seconds.
    pub end: f64,
    /// Mean token log-probability, when reported.
    pub avg_logprob: Option<f64>,
    /// Probability that the segment holds no speech, when reported.
    pub no_speech_prob: Option<f64>,
}

/// Normalized transcription timing.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranscriptTiming {
    /// Full transcript text, if present.
    pub text: String,
    /// Word-level timings in transcript order.
    pub words: Vec<WordTiming>,
    /// Sentence-level segments in transcript order.
    pub segments: Vec<SegmentTiming>,
    /// Spoken duration: explicit `duration` key, else the last word's end.
    pub duration: f64,
}

impl TranscriptTiming {
    /// Parse a transcription payload, accepting the key and type variants seen in practice.
    pub fn from_json(value: &Value) -> ReelResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ReelError::serde("transcript timing must be a JSON object"))?;

        let words = match obj.get("word_timings").or_else(|| obj.get("words")) {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, w)| parse_word(i, w))
                .filter_map(|w| match w {
                    Ok(w) if w.word.is_empty() => None,
                    other => Some(other),
                })
                .collect::<ReelResult<Vec<_>>>()?,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(ReelError::serde("transcript words must be an array")),
        };

        let segments = match obj.get("segments") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, s)| parse_segment(i, s))
                .collect::<ReelResult<Vec<_>>>()?,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(ReelError::serde("transcript segments must be an array")),
        };

        let duration = obj
            .get("duration")
            .and_then(as_f64_lenient)
            .filter(|d| *d > 0.0)
            .or_else(|| words.last().map(|w| w.end))
            .unwrap_or(0.0);

        Ok(Self {
            text: obj
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string(),
            words,
            segments,
            duration,
        })
    }
}

fn parse_word(i: usize, v: &Value) -> ReelResult<WordTiming> {
    let word = v
        .get("word")
        .or_else(|| v.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    Ok(WordTiming {
        word,
        start: required_time(v, "start", || format!("word {i}"))?,
        end: required_time(v, "end", || format!("word {i}"))?,
    })
}

fn parse_segment(i: usize, v: &Value) -> ReelResult<SegmentTiming> {
    Ok(SegmentTiming {
        text: v
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
        start: required_time(v, "start", || format!("segment {i}"))?,
        end: required_time(v, "end", || format!("segment {i}"))?,
        avg_logprob: v.get("avg_logprob").and_then(as_f64_lenient),
        no_speech_prob: v.get("no_speech_prob").and_then(as_f64_lenient),
    })
}

fn required_time(v: &Value, key: &str, what: impl Fn() -> String) -> ReelResult<f64> {
    let raw = v
        .get(key)
        .ok_or_else(|| ReelError::serde(format!("{} missing required key '{key}'", what())))?;
    as_f64_lenient(raw)
        .filter(|t| t.is_finite())
        .ok_or_else(|| ReelError::serde(format!("{} has non-numeric '{key}'", what())))
}

fn as_f64_lenient(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Build captions from a transcript.
///
/// Consecutive words are grouped `words_per_caption` at a time; without word timings the
/// sentence segments are used as-is (blank ones dropped).
pub fn captions_from_timing(
    timing: &TranscriptTiming,
    words_per_caption: usize,
) -> Vec<CaptionSegment> {
    if timing.words.is_empty() {
        return timing
            .segments
            .iter()
            .filter(|s| !s.text.is_empty())
            .map(|s| CaptionSegment::new(s.start, s.end, s.text.clone()))
            .collect();
    }

    timing
        .words
        .chunks(words_per_caption.max(1))
        .filter_map(|group| {
            let (first, last) = (group.first()?, group.last()?);
            let text = group
                .iter()
                .map(|w| w.word.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Some(CaptionSegment::new(first.start, last.end, text))
        })
        .collect()
}

/// Spread `texts` evenly across `total_duration` seconds, in order.
pub fn sample_captions<S: AsRef<str>>(texts: &[S], total_duration: f64) -> Vec<CaptionSegment> {
    if texts.is_empty() {
        return Vec::new();
    }
    let step = total_duration / texts.len() as f64;
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            CaptionSegment::new(i as f64 * step, (i + 1) as f64 * step, text.as_ref())
        })
        .collect()
}

/// Load captions from a JSON file holding either a transcript object or a plain array of
/// `{start, end, text}` segments.
pub fn load_captions(path: &Path, words_per_caption: usize) -> ReelResult<Vec<CaptionSegment>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read caption timing '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| ReelError::serde(format!("'{}': {e}", path.display())))?;
    captions_from_value(&value, words_per_caption)
}

/// [`load_captions`] on an already parsed document.
pub fn captions_from_value(
    value: &Value,
    words_per_caption: usize,
) -> ReelResult<Vec<CaptionSegment>> {
    if value.is_array() {
        return serde_json::from_value(value.clone())
            .map_err(|e| ReelError::serde(format!("invalid caption array: {e}")));
    }
    let timing = TranscriptTiming::from_json(value)?;
    Ok(captions_from_timing(&timing, words_per_caption))
}

#[cfg(test)]
#[path = "../../tests/unit/captions/timing.rs"]
mod tests;
