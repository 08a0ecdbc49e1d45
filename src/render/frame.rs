use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{lerp_u8, mul_div255_u16, unit_to_u8};

/// One output raster: row-major RGBA8, opaque once composed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4`.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Opaque frame filled with one color.
    pub fn solid(canvas: Canvas, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(canvas.rgba_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// Take ownership of an `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Composite straight-alpha pixels over opaque black.
    pub(crate) fn flatten_over_black(&mut self) {
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 255 {
                continue;
            }
            px[0] = mul_div255_u16(u16::from(px[0]), a) as u8;
            px[1] = mul_div255_u16(u16::from(px[1]), a) as u8;
            px[2] = mul_div255_u16(u16::from(px[2]), a) as u8;
            px[3] = 255;
        }
    }

    /// Composite a premultiplied RGBA8 band over this frame, scaled by `opacity`.
    ///
    /// The band covers full-width rows starting at `top`; rows past the frame bottom are
    /// ignored.
    pub(crate) fn composite_band_premul(
        &mut self,
        band: &[u8],
        top: u32,
        opacity: f32,
    ) -> ReelResult<()> {
        let row_len = self.width as usize * 4;
        if row_len == 0 || !band.len().is_multiple_of(row_len) {
            return Err(ReelError::render(
                "overlay band length is not a whole number of frame rows",
            ));
        }
        let k = u16::from(unit_to_u8(opacity));
        if k == 0 || top >= self.height {
            return Ok(());
        }

        let start = top as usize * row_len;
        let end = self.data.len().min(start + band.len());
        let dst = &mut self.data[start..end];
        for (d, s) in dst.chunks_exact_mut(4).zip(band.chunks_exact(4)) {
            let sa = mul_div255_u16(u16::from(s[3]), k);
            if sa == 0 {
                continue;
            }
            let inv = 255 - sa;
            for c in 0..3 {
                let sc = mul_div255_u16(u16::from(s[c]), k);
                d[c] = (sc + mul_div255_u16(u16::from(d[c]), inv)).min(255) as u8;
            }
            d[3] = 255;
        }
        Ok(())
    }

    /// Write the frame as a PNG.
    pub fn save_png(&self, path: &Path) -> ReelResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write frame png '{}'", path.display()))?;
        Ok(())
    }
}

/// Linear per-pixel interpolation: `from` at `factor = 0`, `to` at `factor = 1`.
pub fn crossfade(from: &FrameRGBA, to: &FrameRGBA, factor: f32) -> ReelResult<FrameRGBA> {
    if from.width != to.width || from.height != to.height || from.data.len() != to.data.len() {
        return Err(ReelError::render(format!(
            "crossfade size mismatch: {}x{} vs {}x{}",
            from.width, from.height, to.width, to.height
        )));
    }
    let t = unit_to_u8(factor);
    if t == 0 {
        return Ok(from.clone());
    }
    if t == 255 {
        return Ok(to.clone());
    }

    let data = from
        .data
        .iter()
        .zip(to.data.iter())
        .map(|(&a, &b)| lerp_u8(a, b, t))
        .collect();
    Ok(FrameRGBA {
        width: from.width,
        height: from.height,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
