//! Timed caption text: data model, timing ingestion, fonts, layout and drawing.

/// Font candidate chain.
pub mod fonts;
/// Font-size search and greedy wrapping.
pub mod layout;
/// `CaptionSegment` and batch validation.
pub mod model;
/// Caption selection, fade envelope and outlined text overlay.
pub mod render;
pub(crate) mod text;
/// Transcription payloads to caption segments.
pub mod timing;
