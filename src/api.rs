use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::media::probe_audio;
use crate::captions::model::{CaptionSegment, max_caption_end, validate_captions};
use crate::config::presets::QualityPreset;
use crate::config::settings::RenderConfig;
use crate::encode::ffmpeg::{FfmpegMuxer, Muxer};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::sequence::CancelToken;
use crate::session::{RenderRequest, render};
use crate::timeline::planner::IMAGE_COUNT;

/// Caller-facing description of one video.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoJob {
    /// Beginning, middle and end stills.
    pub images: Vec<PathBuf>,
    /// Narration track.
    pub audio: PathBuf,
    /// Timed caption text.
    pub captions: Vec<CaptionSegment>,
    /// File name inside the output directory; `video_NNN.mp4` when absent.
    pub output_filename: Option<String>,
    /// Output length; derived from the audio, then the captions, when absent.
    pub duration_secs: Option<f64>,
    /// Resolution and frame-rate tier.
    pub quality: QualityPreset,
}

/// Result of [`ReelApi::create_video`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoReport {
    /// Written video.
    pub video_path: PathBuf,
    /// Output length in seconds.
    pub duration: f64,
    /// Stills used.
    pub image_count: usize,
    /// Captions supplied.
    pub text_segments: usize,
    /// Frames rendered.
    pub frames: u64,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Output frame rate.
    pub fps: f64,
}

/// Video creation entry point bound to one output directory.
pub struct ReelApi {
    output_dir: PathBuf,
    config: RenderConfig,
    muxer: Arc<dyn Muxer>,
}

impl ReelApi {
    /// Bind to `output_dir`, creating it if needed. Muxes with the system `ffmpeg`.
    pub fn new(output_dir: impl Into<PathBuf>, config: RenderConfig) -> ReelResult<Self> {
        config.validate()?;
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create output directory '{}'", output_dir.display())
        })?;
        Ok(Self {
            output_dir,
            config,
            muxer: Arc::new(FfmpegMuxer::new()),
        })
    }

    /// Replace the muxer.
    pub fn with_muxer(mut self, muxer: Arc<dyn Muxer>) -> Self {
        self.muxer = muxer;
        self
    }

    /// Directory videos are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validate `job`, render it and report what was written.
    pub fn create_video(&self, job: VideoJob) -> ReelResult<VideoReport> {
        self.create_video_with_cancel(job, &CancelToken::new())
    }

    /// [`ReelApi::create_video`] with a caller-held cancellation token.
    pub fn create_video_with_cancel(
        &self,
        job: VideoJob,
        cancel: &CancelToken,
    ) -> ReelResult<VideoReport> {
        validate_job(&job)?;
        let duration_secs = match job.duration_secs {
            Some(d) => d,
            None => derive_duration(&job.audio, &job.captions)?,
        };
        let filename = match job.output_filename {
            Some(name) => name,
            None => next_video_filename(&self.output_dir)?,
        };

        let request = RenderRequest {
            images: job.images,
            audio: job.audio,
            captions: job.captions,
            duration_secs,
            output_path: self.output_dir.join(filename),
            quality: job.quality,
        };
        tracing::info!(
            output = %request.output_path.display(),
            duration = duration_secs,
            captions = request.captions.len(),
            quality = %request.quality,
            "creating video"
        );

        let summary = render(&request, &self.config, self.muxer.as_ref(), cancel)?;
        Ok(VideoReport {
            video_path: summary.output,
            duration: summary.duration_secs,
            image_count: request.images.len(),
            text_segments: request.captions.len(),
            frames: summary.frames,
            width: summary.canvas.width,
            height: summary.canvas.height,
            fps: summary.fps.as_f64(),
        })
    }
}

fn validate_job(job: &VideoJob) -> ReelResult<()> {
    if job.images.len() != IMAGE_COUNT {
        return Err(ReelError::validation(format!(
            "exactly {IMAGE_COUNT} images are required, got {}",
            job.images.len()
        )));
    }
    for path in &job.images {
        if !path.is_file() {
            return Err(ReelError::asset(path, "image file not found"));
        }
    }
    if !job.audio.is_file() {
        return Err(ReelError::asset(&job.audio, "audio file not found"));
    }
    validate_captions(&job.captions)?;
    if let Some(name) = &job.output_filename {
        let bare = Path::new(name).file_name().is_some_and(|f| f == name.as_str());
        if !bare {
            return Err(ReelError::validation(format!(
                "output filename '{name}' must be a bare file name"
            )));
        }
    }
    if let Some(d) = job.duration_secs
        && (!d.is_finite() || d <= 0.0)
    {
        return Err(ReelError::validation(format!(
            "duration must be finite and > 0, got {d}"
        )));
    }
    Ok(())
}

/// Audio length when `ffprobe` can read it, else the latest caption end.
pub fn derive_duration(audio: &Path, captions: &[CaptionSegment]) -> ReelResult<f64> {
    match probe_audio(audio) {
        Ok(info) if info.duration_secs > 0.0 => return Ok(info.duration_secs),
        Ok(_) => tracing::warn!(audio = %audio.display(), "audio reports no duration"),
        Err(e) => tracing::warn!(error = %e, "audio probe failed, using caption timing"),
    }
    max_caption_end(captions)
        .filter(|d| *d > 0.0)
        .ok_or_else(|| ReelError::validation("cannot derive duration from audio or captions"))
}

/// `video_NNN.mp4`, numbered one past the `.mp4` files already in `dir`.
pub fn next_video_filename(dir: &Path) -> ReelResult<String> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list output directory '{}'", dir.display()))?;
    let mut existing = 0usize;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list '{}'", dir.display()))?;
        let path = entry.path();
        let visible = !entry.file_name().to_string_lossy().starts_with('.');
        if visible && path.extension().is_some_and(|e| e == "mp4") {
            existing += 1;
        }
    }
    Ok(format!("video_{:03}.mp4", existing + 1))
}

#[cfg(test)]
#[path = "../tests/unit/api.rs"]
mod tests;
