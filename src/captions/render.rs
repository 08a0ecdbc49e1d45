use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::captions::fonts::FontChoice;
use crate::captions::layout::{CaptionFit, FitBounds, TOP_FRACTION, fit_caption};
use crate::captions::model::CaptionSegment;
use crate::captions::text::CaptionTextEngine;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;

/// Share of a caption's span spent fading in, and again fading out.
pub const FADE_FRACTION: f64 = 0.1;

/// Stroke offsets drawn in black before the white fill: the 8 compass directions at
/// radius 3, then again at radius 2.
pub const OUTLINE_OFFSETS: [(i32, i32); 16] = [
    (-3, -3),
    (-3, 0),
    (-3, 3),
    (0, -3),
    (0, 3),
    (3, -3),
    (3, 0),
    (3, 3),
    (-2, -2),
    (-2, 0),
    (-2, 2),
    (0, -2),
    (0, 2),
    (2, -2),
    (2, 0),
    (2, 2),
];

const OUTLINE_RGBA: [u8; 4] = [0, 0, 0, 255];
const FILL_RGBA: [u8; 4] = [255, 255, 255, 255];
/// Rows kept above the block top for ascenders and the stroke.
const BAND_HEADROOM_PX: u32 = 8;

/// Caption visible at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionState {
    /// Index into the caption list.
    pub index: usize,
    /// Fade envelope value in `[0, 1]`.
    pub alpha: f32,
}

/// First caption whose inclusive span contains `t`.
pub fn select_caption(captions: &[CaptionSegment], t: f64) -> Option<(usize, &CaptionSegment)> {
    captions.iter().enumerate().find(|(_, c)| c.contains(t))
}

/// Linear fade-in over the first 10% of the span, fade-out over the last 10%.
pub fn fade_alpha(caption: &CaptionSegment, t: f64) -> f32 {
    let span = caption.duration();
    if span <= 0.0 {
        return 0.0;
    }
    let p = ((t - caption.start) / span).clamp(0.0, 1.0);
    let alpha = if p < FADE_FRACTION {
        p / FADE_FRACTION
    } else if p > 1.0 - FADE_FRACTION {
        (1.0 - p) / FADE_FRACTION
    } else {
        1.0
    };
    alpha.clamp(0.0, 1.0) as f32
}

/// Selected caption and its alpha at `t`, if any.
pub fn caption_state(captions: &[CaptionSegment], t: f64) -> Option<CaptionState> {
    select_caption(captions, t).map(|(index, c)| CaptionState {
        index,
        alpha: fade_alpha(c, t),
    })
}

/// Rasterized caption block: full-width premultiplied RGBA8 rows starting at `top`.
struct CaptionBand {
    top: u32,
    premul: Vec<u8>,
}

/// Rasterized caption blocks for one render, one slot per caption, shared by every worker.
///
/// Layout and rasterization depend only on the caption, so each block is built once, by
/// whichever worker first shows it.
pub struct CaptionBands {
    captions: Arc<[CaptionSegment]>,
    canvas: Canvas,
    bounds: FitBounds,
    font: FontChoice,
    slots: Box<[OnceLock<Result<CaptionBand, String>>]>,
    rasterized: AtomicUsize,
}

impl CaptionBands {
    /// Empty band store for `captions` on frames of size `canvas`.
    pub fn new(captions: Arc<[CaptionSegment]>, canvas: Canvas, font: FontChoice) -> Self {
        let slots = captions.iter().map(|_| OnceLock::new()).collect();
        Self {
            captions,
            canvas,
            bounds: FitBounds::for_canvas(canvas),
            font,
            slots,
            rasterized: AtomicUsize::new(0),
        }
    }

    /// Caption list being rendered.
    pub fn captions(&self) -> &[CaptionSegment] {
        &self.captions
    }

    /// Number of caption blocks rasterized so far.
    pub fn rasterized(&self) -> usize {
        self.rasterized.load(Ordering::Relaxed)
    }
}

/// Draws the active caption onto frames.
///
/// Per-frame work is one alpha composite of the shared caption block. The text engine is
/// created on first use, so workers that only composite cached blocks never build one.
pub struct CaptionRenderer {
    bands: Arc<CaptionBands>,
    engine: Option<CaptionTextEngine>,
}

impl CaptionRenderer {
    /// Renderer with its own band store for `captions` on frames of size `canvas`.
    pub fn new(captions: Arc<[CaptionSegment]>, canvas: Canvas, font: &FontChoice) -> Self {
        Self::with_bands(Arc::new(CaptionBands::new(captions, canvas, font.clone())))
    }

    /// Renderer drawing from a band store shared with other renderers.
    pub fn with_bands(bands: Arc<CaptionBands>) -> Self {
        Self {
            bands,
            engine: None,
        }
    }

    /// Caption list being rendered.
    pub fn captions(&self) -> &[CaptionSegment] {
        self.bands.captions()
    }

    /// Size and wrapping chosen for caption `index`.
    pub fn fit(&mut self, index: usize) -> ReelResult<CaptionFit> {
        let bands = &self.bands;
        let caption = bands
            .captions
            .get(index)
            .ok_or_else(|| ReelError::render(format!("caption index {index} out of range")))?;
        let engine = self
            .engine
            .get_or_insert_with(|| CaptionTextEngine::new(&bands.font));
        Ok(fit_caption(&caption.text, bands.bounds, engine))
    }

    /// Return `frame` with the caption active at `t` drawn over it.
    ///
    /// Frames with no active caption are returned untouched.
    pub fn render(&mut self, mut frame: FrameRGBA, t: f64) -> ReelResult<FrameRGBA> {
        let Some(state) = caption_state(&self.bands.captions, t) else {
            return Ok(frame);
        };
        let canvas = self.bands.canvas;
        if frame.canvas() != canvas {
            return Err(ReelError::render(format!(
                "caption renderer is set up for {}x{}, got a {}x{} frame",
                canvas.width, canvas.height, frame.width, frame.height
            )));
        }
        if state.alpha <= 0.0 {
            return Ok(frame);
        }

        let bands = Arc::clone(&self.bands);
        let band = self.band_for(&bands, state.index)?;
        frame.composite_band_premul(&band.premul, band.top, state.alpha)?;
        Ok(frame)
    }

    fn band_for<'b>(
        &mut self,
        bands: &'b CaptionBands,
        index: usize,
    ) -> ReelResult<&'b CaptionBand> {
        let slot = bands
            .slots
            .get(index)
            .ok_or_else(|| ReelError::render(format!("caption index {index} out of range")))?;
        let band = slot.get_or_init(|| {
            let built = self
                .fit(index)
                .and_then(|fit| self.rasterize(index, &fit))
                .map_err(|e| e.to_string());
            if built.is_ok() {
                bands.rasterized.fetch_add(1, Ordering::Relaxed);
            }
            built
        });
        band.as_ref().map_err(|e| ReelError::render(e.clone()))
    }

    fn rasterize(&mut self, index: usize, fit: &CaptionFit) -> ReelResult<CaptionBand> {
        let Canvas { width, height } = self.bands.canvas;
        let block_top = (height as f32 * TOP_FRACTION) as u32;
        let top = block_top.saturating_sub(BAND_HEADROOM_PX);
        let band_h = height - top;

        let w: u16 = width
            .try_into()
            .map_err(|_| ReelError::render("caption band width exceeds u16"))?;
        let h: u16 = band_h
            .try_into()
            .map_err(|_| ReelError::render("caption band height exceeds u16"))?;

        let bands = &self.bands;
        let engine = self
            .engine
            .get_or_insert_with(|| CaptionTextEngine::new(&bands.font));
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let size = fit.font_size as f32;
        let advance = fit.line_advance() as f64;
        for (i, line) in fit.lines.iter().enumerate() {
            let layout = engine.layout_line(line, size);
            let x = (f64::from(width) - f64::from(layout.width())) / 2.0;
            let y = f64::from(block_top - top) + i as f64 * advance;
            for (dx, dy) in OUTLINE_OFFSETS {
                engine.fill_layout(
                    &mut ctx,
                    &layout,
                    x + f64::from(dx),
                    y + f64::from(dy),
                    OUTLINE_RGBA,
                );
            }
            engine.fill_layout(&mut ctx, &layout, x, y, FILL_RGBA);
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        tracing::trace!(
            caption = index,
            font_size = fit.font_size,
            lines = fit.lines.len(),
            "rasterized caption"
        );
        Ok(CaptionBand {
            top,
            premul: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/render.rs"]
mod tests;
