use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded source still in straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Decoded pixels, shared read-only between frame workers.
    pub rgba: Arc<image::RgbaImage>,
}

/// Decode encoded image bytes into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        anyhow::bail!("image has zero width or height");
    }
    Ok(SourceImage {
        width,
        height,
        rgba: Arc::new(rgba),
    })
}

/// Read and decode an image file, naming the file in any error.
pub fn load_image(path: &Path) -> ReelResult<SourceImage> {
    let bytes = std::fs::read(path).map_err(|e| ReelError::asset(path, format!("read: {e}")))?;
    decode_image(&bytes).map_err(|e| ReelError::asset(path, format!("decode: {e:#}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
