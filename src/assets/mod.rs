//! Source asset IO.
//!
//! All file reads happen here, before frame generation starts; the render stages only see
//! decoded, canvas-sized pixels.

/// Image file decoding.
pub mod decode;
/// `ffprobe`-based audio probing.
pub mod media;
/// Center-crop and resample of stills to the output canvas.
pub mod prepare;
