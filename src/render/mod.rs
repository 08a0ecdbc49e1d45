//! Frame production.
//!
//! [`compose`] builds one frame for an instant; [`sequence`] drives it over the whole
//! timeline on a worker pool and persists numbered PNGs for the muxer.

/// Per-instant frame composition.
pub mod compose;
/// `FrameRGBA` and crossfade blending.
pub mod frame;
/// Parallel frame sequence generation and cancellation.
pub mod sequence;
