use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::decode::load_image;
use crate::assets::prepare::prepare_frame;
use crate::captions::fonts::resolve_font;
use crate::captions::model::{CaptionSegment, validate_captions};
use crate::config::presets::QualityPreset;
use crate::config::settings::RenderConfig;
use crate::encode::ffmpeg::{MuxJob, Muxer, ensure_parent_dir};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::compose::FrameComposer;
use crate::render::frame::FrameRGBA;
use crate::render::sequence::{CancelToken, SequenceThreading, total_frames, write_frame_sequence};
use crate::timeline::planner::{IMAGE_COUNT, TimelinePlanner};

/// One fully specified render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Stills for the beginning, middle and end windows, in that order.
    pub images: Vec<PathBuf>,
    /// Narration track muxed under the frames.
    pub audio: PathBuf,
    /// Timed caption text.
    pub captions: Vec<CaptionSegment>,
    /// Output length in seconds.
    pub duration_secs: f64,
    /// File to create.
    pub output_path: PathBuf,
    /// Resolution and frame-rate tier.
    pub quality: QualityPreset,
}

impl RenderRequest {
    /// Everything needed to compose frames: images, captions and duration.
    pub fn validate_frame_inputs(&self) -> ReelResult<()> {
        if self.images.len() != IMAGE_COUNT {
            return Err(ReelError::validation(format!(
                "exactly {IMAGE_COUNT} images are required, got {}",
                self.images.len()
            )));
        }
        if let Some(missing) = self.images.iter().find(|p| !p.is_file()) {
            return Err(ReelError::asset(missing, "image file not found"));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ReelError::validation(format!(
                "duration must be finite and > 0, got {}",
                self.duration_secs
            )));
        }
        validate_captions(&self.captions)
    }

    /// Full pre-flight check, run before any rendering work.
    pub fn validate(&self) -> ReelResult<()> {
        self.validate_frame_inputs()?;
        if !self.audio.is_file() {
            return Err(ReelError::asset(&self.audio, "audio file not found"));
        }
        if self.output_path.as_os_str().is_empty() || self.output_path.is_dir() {
            return Err(ReelError::validation(format!(
                "output path '{}' must name a file",
                self.output_path.display()
            )));
        }
        Ok(())
    }
}

/// What a finished render produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSummary {
    /// Final output file.
    pub output: PathBuf,
    /// Frames generated and muxed.
    pub frames: u64,
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Output duration in seconds.
    pub duration_secs: f64,
}

/// Prepared, immutable render state: decoded stills, schedule, captions and font.
///
/// Asset IO happens once in [`ReelSession::prepare`]; frame rendering afterwards touches
/// only memory and the frame directory.
pub struct ReelSession {
    composer: FrameComposer,
    fps: Fps,
    duration_secs: f64,
    threading: SequenceThreading,
}

impl ReelSession {
    /// Load and normalize the stills, resolve the caption font and build the schedule.
    #[tracing::instrument(skip_all, fields(quality = %request.quality))]
    pub fn prepare(request: &RenderRequest, config: &RenderConfig) -> ReelResult<Self> {
        config.validate()?;
        request.validate_frame_inputs()?;

        let spec = request.quality.spec();
        spec.canvas.validate()?;
        let duration_secs = request.duration_secs;

        for (i, c) in request.captions.iter().enumerate() {
            if c.start >= duration_secs {
                tracing::warn!(
                    caption = i,
                    start = c.start,
                    duration = duration_secs,
                    "caption starts at or after the end of the video and will not be shown"
                );
            }
        }

        let images = request
            .images
            .iter()
            .map(|path| load_image(path).and_then(|src| prepare_frame(&src, spec.canvas)))
            .collect::<ReelResult<Vec<_>>>()?;

        let font = resolve_font(&config.font_candidates);
        tracing::info!(font = %font.describe(), "caption font");

        let planner =
            TimelinePlanner::new(duration_secs, IMAGE_COUNT, config.transition_window_secs)?;
        let composer = FrameComposer::new(
            planner,
            spec.canvas,
            images,
            request.captions.clone().into(),
            font,
        )?;

        Ok(Self {
            composer,
            fps: spec.fps,
            duration_secs,
            threading: SequenceThreading {
                threads: config.threads,
                chunk_size: config.chunk_size,
            },
        })
    }

    /// Output frame size.
    pub fn canvas(&self) -> Canvas {
        self.composer.canvas()
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frames a full render produces.
    pub fn total_frames(&self) -> u64 {
        total_frames(self.duration_secs, self.fps)
    }

    /// Compose the single frame shown at `t` seconds.
    pub fn render_frame(&self, t: f64) -> ReelResult<FrameRGBA> {
        if !t.is_finite() || t < 0.0 || t > self.duration_secs {
            return Err(ReelError::validation(format!(
                "preview instant {t} is outside [0, {}]",
                self.duration_secs
            )));
        }
        self.composer.worker().compose(t)
    }

    /// Generate all frames, mux them with `audio` and move the result to `output`.
    ///
    /// The frame directory is removed on every exit path. Nothing is left at `output`
    /// unless the mux succeeded.
    #[tracing::instrument(skip_all, fields(output = %output.display()))]
    pub fn render_to_file(
        &self,
        audio: &Path,
        output: &Path,
        overwrite: bool,
        muxer: &dyn Muxer,
        cancel: &CancelToken,
    ) -> ReelResult<RenderSummary> {
        if !overwrite && output.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                output.display()
            )));
        }
        ensure_parent_dir(output)?;

        let canvas = self.canvas();
        tracing::info!(
            frames = self.total_frames(),
            width = canvas.width,
            height = canvas.height,
            fps = self.fps.as_f64(),
            "render started"
        );

        let scratch = FrameScratch::new()?;
        let stats = write_frame_sequence(
            &self.composer,
            self.fps,
            scratch.path(),
            &self.threading,
            cancel,
        )?;
        cancel.check()?;

        let partial = partial_output(output)?;
        let job = MuxJob::new(
            scratch.path(),
            audio,
            partial.to_path_buf(),
            self.fps,
            self.duration_secs,
        );
        if let Err(e) = muxer.mux(&job) {
            discard_partial(partial);
            return Err(e);
        }
        move_into_place(partial, output)?;
        drop(scratch);

        tracing::info!(frames = stats.frames, "render finished");
        Ok(RenderSummary {
            output: output.to_path_buf(),
            frames: stats.frames,
            canvas,
            fps: self.fps,
            duration_secs: self.duration_secs,
        })
    }
}

/// Validate `request`, render it and mux it to `request.output_path`.
pub fn render(
    request: &RenderRequest,
    config: &RenderConfig,
    muxer: &dyn Muxer,
    cancel: &CancelToken,
) -> ReelResult<RenderSummary> {
    request.validate()?;
    let session = ReelSession::prepare(request, config)?;
    session.render_to_file(
        &request.audio,
        &request.output_path,
        config.overwrite,
        muxer,
        cancel,
    )
}

/// Compose only the frame at `t` seconds; no audio is read and nothing is muxed.
pub fn render_preview_frame(
    request: &RenderRequest,
    config: &RenderConfig,
    t: f64,
) -> ReelResult<FrameRGBA> {
    ReelSession::prepare(request, config)?.render_frame(t)
}

/// Temp directory owned by one render; removed when dropped.
struct FrameScratch(Option<tempfile::TempDir>);

impl FrameScratch {
    fn new() -> ReelResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("abstract-reel-frames-")
            .tempdir()
            .context("failed to create temporary frame directory")?;
        tracing::debug!(dir = %dir.path().display(), "frame directory created");
        Ok(Self(Some(dir)))
    }

    fn path(&self) -> &Path {
        self.0.as_ref().map_or(Path::new(""), |d| d.path())
    }
}

impl Drop for FrameScratch {
    fn drop(&mut self) {
        if let Some(dir) = self.0.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!(dir = %path.display(), error = %e, "failed to remove frame directory");
            }
        }
    }
}

/// Hidden, uniquely named sibling of `output` that the muxer writes before the final rename.
///
/// Created empty; removed when the returned path is dropped unless it was persisted.
fn partial_output(output: &Path) -> ReelResult<tempfile::TempPath> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    let prefix = format!(".{stem}.");
    let suffix = format!(".partial.{ext}");

    let file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(&suffix)
        .tempfile_in(dir)
        .with_context(|| format!("failed to create partial output in '{}'", dir.display()))?;
    Ok(file.into_temp_path())
}

/// Rename a finished partial over `output`. The previous output stays until the rename.
fn move_into_place(partial: tempfile::TempPath, output: &Path) -> ReelResult<()> {
    let len = std::fs::metadata(&partial).map_or(0, |m| m.len());
    if len == 0 {
        return Err(ReelError::encode(format!(
            "muxer did not produce '{}'",
            partial.display()
        )));
    }
    let from = partial.to_path_buf();
    partial.persist(output).with_context(|| {
        format!(
            "failed to move '{}' to '{}'",
            from.display(),
            output.display()
        )
    })?;
    Ok(())
}

fn discard_partial(partial: tempfile::TempPath) {
    let path = partial.to_path_buf();
    if let Err(e) = partial.close()
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output");
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
