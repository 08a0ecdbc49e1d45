use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abstract_reel::{
    QualityPreset, ReelApi, RenderConfig, RenderRequest, VideoJob, load_captions,
    max_caption_end, render_preview_frame, sample_captions,
};

#[derive(Parser, Debug)]
#[command(name = "abstract-reel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Convert transcription timing JSON to a caption array.
    Captions(CaptionsArgs),
    /// Spread caption texts evenly over a duration.
    SampleTiming(SampleTimingArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Beginning, middle and end stills, in order.
    #[arg(long = "image", required = true, num_args = 1)]
    images: Vec<PathBuf>,

    /// Caption JSON: transcription timing or an array of `{start, end, text}`.
    #[arg(long)]
    captions: PathBuf,

    /// Output quality tier.
    #[arg(long, value_enum, default_value_t = QualityPreset::Medium)]
    quality: QualityPreset,

    /// Output duration in seconds. Derived from the audio or the captions when omitted.
    #[arg(long)]
    duration: Option<f64>,

    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame worker threads (overrides config and env).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    src: SourceArgs,

    /// Narration audio.
    #[arg(long)]
    audio: PathBuf,

    /// Output MP4 path. When omitted, `video_NNN.mp4` is created in `--out-dir`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory for auto-named output.
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    src: SourceArgs,

    /// Instant to render, in seconds.
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct CaptionsArgs {
    /// Transcription timing JSON.
    #[arg(long)]
    timing: PathBuf,

    /// Words grouped into one caption.
    #[arg(long, default_value_t = abstract_reel::DEFAULT_WORDS_PER_CAPTION)]
    words_per_caption: usize,
}

#[derive(Args, Debug)]
struct SampleTimingArgs {
    /// Caption texts, in display order.
    #[arg(long = "text", required = true)]
    texts: Vec<String>,

    /// Total duration in seconds.
    #[arg(long)]
    duration: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Captions(args) => cmd_captions(args),
        Command::SampleTiming(args) => cmd_sample_timing(args),
    }
}

fn load_config(src: &SourceArgs) -> anyhow::Result<RenderConfig> {
    let mut config = match &src.config {
        Some(path) => RenderConfig::from_path(path)?,
        None => RenderConfig::default(),
    }
    .with_env_overrides();
    if src.threads.is_some() {
        config.threads = src.threads;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(&args.src)?;
    let captions = load_captions(&args.src.captions, config.words_per_caption)?;

    let (out_dir, output_filename) = match &args.out {
        Some(out) => {
            let name = out
                .file_name()
                .with_context(|| format!("output path '{}' has no file name", out.display()))?
                .to_string_lossy()
                .into_owned();
            let dir = out
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            (dir.to_path_buf(), Some(name))
        }
        None => (args.out_dir.clone(), None),
    };

    let api = ReelApi::new(out_dir, config)?;
    let report = api.create_video(VideoJob {
        images: args.src.images,
        audio: args.audio,
        captions,
        output_filename,
        duration_secs: args.src.duration,
        quality: args.src.quality,
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(&args.src)?;
    let captions = load_captions(&args.src.captions, config.words_per_caption)?;
    let duration_secs = match args.src.duration {
        Some(d) => d,
        None => max_caption_end(&captions).context("captions carry no usable end time")?,
    };

    let request = RenderRequest {
        images: args.src.images,
        audio: PathBuf::new(),
        captions,
        duration_secs,
        output_path: args.out.clone(),
        quality: args.src.quality,
    };
    let frame = render_preview_frame(&request, &config, args.at)?;

    abstract_reel::ensure_parent_dir(&args.out)?;
    frame.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_captions(args: CaptionsArgs) -> anyhow::Result<()> {
    let captions = load_captions(&args.timing, args.words_per_caption)?;
    println!("{}", serde_json::to_string_pretty(&captions)?);
    Ok(())
}

fn cmd_sample_timing(args: SampleTimingArgs) -> anyhow::Result<()> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        anyhow::bail!("--duration must be > 0");
    }
    let captions = sample_captions(&args.texts, args.duration);
    println!("{}", serde_json::to_string_pretty(&captions)?);
    Ok(())
}
