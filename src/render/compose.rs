use std::sync::Arc;

use crate::captions::fonts::FontChoice;
use crate::captions::model::CaptionSegment;
use crate::captions::render::{CaptionBands, CaptionRenderer};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::{FrameRGBA, crossfade};
use crate::timeline::planner::TimelinePlanner;

/// Inputs shared by every frame worker: prepared stills, the schedule and the caption
/// blocks, each rasterized once.
pub struct FrameComposer {
    planner: TimelinePlanner,
    canvas: Canvas,
    images: Arc<[FrameRGBA]>,
    bands: Arc<CaptionBands>,
}

impl FrameComposer {
    /// Check that every still is canvas-sized and that there is one per image window.
    pub fn new(
        planner: TimelinePlanner,
        canvas: Canvas,
        images: Vec<FrameRGBA>,
        captions: Arc<[CaptionSegment]>,
        font: FontChoice,
    ) -> ReelResult<Self> {
        if images.len() != planner.image_count() {
            return Err(ReelError::validation(format!(
                "expected {} prepared images, got {}",
                planner.image_count(),
                images.len()
            )));
        }
        if let Some((i, img)) = images.iter().enumerate().find(|(_, f)| f.canvas() != canvas) {
            return Err(ReelError::render(format!(
                "prepared image {i} is {}x{}, canvas is {}x{}",
                img.width, img.height, canvas.width, canvas.height
            )));
        }
        Ok(Self {
            planner,
            canvas,
            images: images.into(),
            bands: Arc::new(CaptionBands::new(captions, canvas, font)),
        })
    }

    /// Output frame size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Image schedule.
    pub fn planner(&self) -> &TimelinePlanner {
        &self.planner
    }

    /// Background at `t`: the primary still, crossfaded into the next one inside a
    /// transition window.
    pub fn background(&self, t: f64) -> ReelResult<FrameRGBA> {
        let active = self.planner.active_images(t);
        let primary = &self.images[active.primary];
        match active.secondary {
            Some(next) if active.blend > 0.0 => crossfade(primary, &self.images[next], active.blend),
            _ => Ok(primary.clone()),
        }
    }

    /// Caption blocks rasterized so far across all workers.
    pub fn caption_bands_rasterized(&self) -> usize {
        self.bands.rasterized()
    }

    /// Per-worker state. Cheap to build; the text engine is created only if this worker
    /// has to rasterize a caption block itself.
    pub fn worker(&self) -> ComposeWorker<'_> {
        ComposeWorker {
            composer: self,
            captions: CaptionRenderer::with_bands(Arc::clone(&self.bands)),
        }
    }
}

/// Composes full frames for one thread.
pub struct ComposeWorker<'a> {
    composer: &'a FrameComposer,
    captions: CaptionRenderer,
}

impl ComposeWorker<'_> {
    /// Background plus the caption active at `t`.
    pub fn compose(&mut self, t: f64) -> ReelResult<FrameRGBA> {
        let base = self.composer.background(t)?;
        self.captions.render(base, t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
