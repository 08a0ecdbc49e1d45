use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

/// Basic metadata about the narration audio.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSourceInfo {
    /// Container duration in seconds.
    pub duration_secs: f64,
    /// Codec of the first audio stream, when reported.
    pub codec: Option<String>,
}

/// Probe audio duration and codec through `ffprobe`.
pub fn probe_audio(source_path: &Path) -> ReelResult<AudioSourceInfo> {
    if !source_path.is_file() {
        return Err(ReelError::asset(source_path, "audio file not found"));
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::asset(source_path, format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::asset(
            source_path,
            format!("ffprobe failed: {}", String::from_utf8_lossy(&out.stderr).trim()),
        ));
    }

    parse_probe_json(&out.stdout).map_err(|e| ReelError::asset(source_path, e))
}

fn parse_probe_json(stdout: &[u8]) -> Result<AudioSourceInfo, String> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        codec_name: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut =
        serde_json::from_slice(stdout).map_err(|e| format!("ffprobe json parse failed: {e}"))?;
    let audio = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| "no audio stream found".to_string())?;

    // Stream duration is absent for some containers; the format duration always covers it.
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(audio.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| "ffprobe reported no usable duration".to_string())?;

    Ok(AudioSourceInfo {
        duration_secs,
        codec: audio.codec_name.clone(),
    })
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(tool: &str) -> bool {
    std::process::Command::new(tool)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
