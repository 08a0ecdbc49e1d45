use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::assets::media::is_ffmpeg_on_path;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::sequence::{FIRST_SEQUENCE_NUMBER, FRAME_PATTERN};

/// Everything the muxer needs to turn a frame directory plus narration into one file.
#[derive(Clone, Debug, PartialEq)]
pub struct MuxJob {
    /// Directory holding the numbered frame files.
    pub frames_dir: PathBuf,
    /// `printf`-style frame file pattern inside `frames_dir`.
    pub pattern: String,
    /// Narration audio.
    pub audio: PathBuf,
    /// File to create.
    pub output: PathBuf,
    /// Frame rate of the sequence.
    pub fps: Fps,
    /// Hard output duration in seconds.
    pub duration_secs: f64,
}

impl MuxJob {
    /// Job reading the standard frame naming from `frames_dir`.
    pub fn new(
        frames_dir: impl Into<PathBuf>,
        audio: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        fps: Fps,
        duration_secs: f64,
    ) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            pattern: FRAME_PATTERN.to_string(),
            audio: audio.into(),
            output: output.into(),
            fps,
            duration_secs,
        }
    }

    /// Reject jobs the encoder cannot run.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ReelError::validation("mux duration must be finite and > 0"));
        }
        if !self.frames_dir.is_dir() {
            return Err(ReelError::validation(format!(
                "frame directory '{}' does not exist",
                self.frames_dir.display()
            )));
        }
        if !self.audio.is_file() {
            return Err(ReelError::asset(&self.audio, "audio file not found"));
        }
        Ok(())
    }
}

/// Combines a persisted frame sequence and an audio track into one output file.
pub trait Muxer: Send + Sync {
    /// Write `job.output`. Must not leave a usable-looking file behind on failure.
    fn mux(&self, job: &MuxJob) -> ReelResult<()>;
}

/// [`Muxer`] backed by the system `ffmpeg` binary: H.264 + AAC in MP4, `yuv420p`, trimmed
/// with `-t` to the job duration.
#[derive(Clone, Debug)]
pub struct FfmpegMuxer {
    program: PathBuf,
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegMuxer {
    /// Muxer running `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Muxer running a specific `ffmpeg` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Full argument list passed to `ffmpeg` for `job`.
    pub fn args(job: &MuxJob) -> Vec<String> {
        let input = job.frames_dir.join(&job.pattern);
        vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-framerate".into(),
            format!("{}/{}", job.fps.num, job.fps.den),
            "-start_number".into(),
            FIRST_SEQUENCE_NUMBER.to_string(),
            "-i".into(),
            input.to_string_lossy().into_owned(),
            "-i".into(),
            job.audio.to_string_lossy().into_owned(),
            "-map".into(),
            "0:v:0".into(),
            "-map".into(),
            "1:a:0".into(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-c:a".into(),
            "aac".into(),
            "-t".into(),
            format!("{:.3}", job.duration_secs),
            "-movflags".into(),
            "+faststart".into(),
            job.output.to_string_lossy().into_owned(),
        ]
    }
}

impl Muxer for FfmpegMuxer {
    #[tracing::instrument(skip_all, fields(output = %job.output.display()))]
    fn mux(&self, job: &MuxJob) -> ReelResult<()> {
        job.validate()?;
        ensure_parent_dir(&job.output)?;
        if self.program == Path::new("ffmpeg") && !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for muxing, but was not found on PATH",
            ));
        }

        let output = Command::new(&self.program)
            .args(Self::args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ReelError::encode(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if std::fs::metadata(&job.output).map_or(true, |m| m.len() == 0) {
            return Err(ReelError::encode(format!(
                "ffmpeg reported success but '{}' is missing or empty",
                job.output.display()
            )));
        }
        tracing::debug!("ffmpeg mux finished");
        Ok(())
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
