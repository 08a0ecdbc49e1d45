use image::imageops::{self, FilterType};

use crate::assets::decode::SourceImage;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;

/// Source-pixel rectangle kept by the center crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Kept width.
    pub width: u32,
    /// Kept height.
    pub height: u32,
}

/// Largest rectangle with the canvas aspect ratio, centered in a `src_w x src_h` image.
///
/// Relatively wider sources lose columns on both sides, relatively taller ones lose rows.
pub fn center_crop_rect(src_w: u32, src_h: u32, canvas: Canvas) -> CropRect {
    let src_aspect = f64::from(src_w) / f64::from(src_h);
    let target_aspect = canvas.aspect();

    if src_aspect > target_aspect {
        let width = ((f64::from(src_h) * target_aspect).round() as u32).clamp(1, src_w);
        CropRect {
            x: (src_w - width) / 2,
            y: 0,
            width,
            height: src_h,
        }
    } else if src_aspect < target_aspect {
        let height = ((f64::from(src_w) / target_aspect).round() as u32).clamp(1, src_h);
        CropRect {
            x: 0,
            y: (src_h - height) / 2,
            width: src_w,
            height,
        }
    } else {
        CropRect {
            x: 0,
            y: 0,
            width: src_w,
            height: src_h,
        }
    }
}

/// Normalize a source still to exactly fill `canvas`: center-crop to the canvas aspect, then
/// Lanczos resample. Transparent source pixels are flattened over black.
pub fn prepare_frame(src: &SourceImage, canvas: Canvas) -> ReelResult<FrameRGBA> {
    canvas.validate()?;
    let rect = center_crop_rect(src.width, src.height, canvas);
    let cropped = imageops::crop_imm(src.rgba.as_ref(), rect.x, rect.y, rect.width, rect.height)
        .to_image();

    let resized = if (rect.width, rect.height) == (canvas.width, canvas.height) {
        cropped
    } else {
        imageops::resize(&cropped, canvas.width, canvas.height, FilterType::Lanczos3)
    };

    let mut frame = FrameRGBA::from_rgba_image(resized);
    frame.flatten_over_black();
    if frame.width != canvas.width || frame.height != canvas.height {
        return Err(ReelError::render(format!(
            "prepared frame is {}x{}, expected {}x{}",
            frame.width, frame.height, canvas.width, canvas.height
        )));
    }
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/prepare.rs"]
mod tests;
