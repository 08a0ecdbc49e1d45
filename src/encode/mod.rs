//! Muxing of frame sequences with narration audio.

/// `Muxer` trait and the system `ffmpeg` implementation.
pub mod ffmpeg;
