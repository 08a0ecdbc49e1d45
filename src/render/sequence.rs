use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::compose::FrameComposer;

/// `printf`-style name of persisted frames, as handed to the muxer.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

/// First sequence number used in [`FRAME_PATTERN`].
pub const FIRST_SEQUENCE_NUMBER: u64 = 1;

/// File name of `frame` inside the frame directory.
pub fn frame_file_name(frame: FrameIndex) -> String {
    format!("frame_{:06}.png", frame.sequence_number())
}

/// Shared flag that stops frame generation at the next frame boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// `true` once [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> ReelResult<()> {
        if self.is_cancelled() {
            Err(ReelError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Parallelism knobs for [`write_frame_sequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceThreading {
    /// Worker count; `None` uses every core.
    pub threads: Option<usize>,
    /// Frames scheduled per batch.
    pub chunk_size: usize,
}

impl Default for SequenceThreading {
    fn default() -> Self {
        Self {
            threads: None,
            chunk_size: 32,
        }
    }
}

/// Counters reported after a sequence is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceStats {
    /// Frames written.
    pub frames: u64,
    /// Batches scheduled.
    pub chunks: u64,
}

/// Frames needed for `duration_secs`: `floor(duration * fps)`, covering `[0, duration)`.
pub fn total_frames(duration_secs: f64, fps: Fps) -> u64 {
    fps.secs_to_frames_floor(duration_secs)
}

/// Render every frame of the composer's timeline and persist it under `dir`.
///
/// Frames are produced in parallel but named by sequence number, so the directory always
/// reads back in timeline order. The first failing frame aborts the whole sequence.
#[tracing::instrument(skip_all, fields(dir = %dir.display(), fps = fps.as_f64()))]
pub fn write_frame_sequence(
    composer: &FrameComposer,
    fps: Fps,
    dir: &Path,
    threading: &SequenceThreading,
    cancel: &CancelToken,
) -> ReelResult<SequenceStats> {
    let total = total_frames(composer.planner().duration_secs(), fps);
    if total == 0 {
        return Err(ReelError::validation(format!(
            "duration {}s is shorter than one frame at {} fps",
            composer.planner().duration_secs(),
            fps.as_f64()
        )));
    }
    if !dir.is_dir() {
        return Err(ReelError::render(format!(
            "frame directory '{}' does not exist",
            dir.display()
        )));
    }

    let range = FrameRange::new(FrameIndex(0), FrameIndex(total))?;
    let pool = build_thread_pool(threading.threads)?;
    let started = Instant::now();
    let mut stats = SequenceStats::default();

    for chunk in range.chunks(normalized_chunk_size(threading.chunk_size)) {
        cancel.check()?;
        pool.install(|| {
            (chunk.start.0..chunk.end.0).into_par_iter().try_for_each_init(
                || composer.worker(),
                |worker, f| -> ReelResult<()> {
                    cancel.check()?;
                    let frame = FrameIndex(f);
                    let composed = worker.compose(fps.frame_to_secs(frame))?;
                    composed.save_png(&dir.join(frame_file_name(frame)))
                },
            )
        })?;
        stats.frames += chunk.len_frames();
        stats.chunks += 1;
        tracing::debug!(
            done = stats.frames,
            total,
            "frame chunk {}..{} written",
            chunk.start.0,
            chunk.end.0
        );
    }

    tracing::info!(
        frames = stats.frames,
        caption_bands = composer.caption_bands_rasterized(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "frame sequence written"
    );
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::validation("threads must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/sequence.rs"]
mod tests;
