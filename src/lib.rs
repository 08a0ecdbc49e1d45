//! abstract-reel turns three stills, a narration track and timed captions into a short
//! portrait video.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: decode the stills and center-crop/resample them to the preset canvas.
//! 2. **Plan**: split the duration into one window per still, with a crossfade at the end of
//!    each non-final window ([`TimelinePlanner`]).
//! 3. **Compose**: per frame, blend the active stills and draw the active caption with its
//!    fade envelope ([`FrameComposer`]).
//! 4. **Sequence**: render every frame on a bounded rayon pool into a private temp
//!    directory as numbered PNGs ([`write_frame_sequence`]).
//! 5. **Mux**: hand the frames and the audio to a [`Muxer`] (system `ffmpeg` by default),
//!    trimmed to the exact duration, then move the result into place.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Fail fast**: inputs are validated before any frame is rendered.
//! - **No partial output**: a failed or cancelled render leaves nothing at the output path
//!   and always removes its frame directory.
//! - **Deterministic**: identical inputs yield identical frame counts, caption selection and
//!   blend factors.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod assets;
mod captions;
mod config;
mod encode;
mod foundation;
mod render;
mod session;
mod timeline;

pub use api::{ReelApi, VideoJob, VideoReport, derive_duration, next_video_filename};
pub use assets::decode::{SourceImage, decode_image, load_image};
pub use assets::media::{AudioSourceInfo, is_ffmpeg_on_path, is_ffprobe_on_path, probe_audio};
pub use assets::prepare::{CropRect, center_crop_rect, prepare_frame};
pub use captions::fonts::{FontChoice, SYSTEM_FALLBACK_STACK, default_font_candidates, resolve_font};
pub use captions::layout::{
    CaptionFit, FitBounds, LINE_GAP_PX, MAX_HEIGHT_FRACTION, MAX_WIDTH_FRACTION, TOP_FRACTION,
    TextMeasure, fit_caption, wrap_greedy,
};
pub use captions::model::{CaptionSegment, max_caption_end, validate_captions};
pub use captions::render::{
    CaptionBands, CaptionRenderer, CaptionState, FADE_FRACTION, OUTLINE_OFFSETS, caption_state,
    fade_alpha, select_caption,
};
pub use captions::timing::{
    DEFAULT_WORDS_PER_CAPTION, SegmentTiming, TranscriptTiming, WordTiming, captions_from_timing,
    captions_from_value, load_captions, sample_captions,
};
pub use config::presets::{PresetSpec, QualityPreset};
pub use config::settings::{FONT_ENV, RenderConfig, THREADS_ENV};
pub use encode::ffmpeg::{FfmpegMuxer, MuxJob, Muxer, ensure_parent_dir};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use foundation::error::{ReelError, ReelResult};
pub use render::compose::{ComposeWorker, FrameComposer};
pub use render::frame::{FrameRGBA, crossfade};
pub use render::sequence::{
    CancelToken, FIRST_SEQUENCE_NUMBER, FRAME_PATTERN, SequenceStats, SequenceThreading,
    frame_file_name, total_frames, write_frame_sequence,
};
pub use session::{ReelSession, RenderRequest, RenderSummary, render, render_preview_frame};
pub use timeline::planner::{
    ActiveImages, DEFAULT_TRANSITION_SECS, IMAGE_COUNT, TimelinePlanner,
};
