use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::captions::fonts::default_font_candidates;
use crate::foundation::error::{ReelError, ReelResult};

/// Env knob overriding [`RenderConfig::threads`].
pub const THREADS_ENV: &str = "ABSTRACT_REEL_THREADS";
/// Env knob naming a font file tried before every configured candidate.
pub const FONT_ENV: &str = "ABSTRACT_REEL_FONT";

/// Tunables shared by every render, resolved once at the orchestration boundary.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Trailing part of each image window during which the next image fades in.
    pub transition_window_secs: f64,
    /// Rayon worker count for frame generation; `None` uses every core.
    pub threads: Option<usize>,
    /// Frames scheduled per parallel batch.
    pub chunk_size: usize,
    /// Font files tried in order for caption text.
    pub font_candidates: Vec<PathBuf>,
    /// Transcribed words grouped into one caption.
    pub words_per_caption: usize,
    /// Replace an existing file at the output path.
    pub overwrite: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            transition_window_secs: 0.5,
            threads: None,
            chunk_size: 32,
            font_candidates: default_font_candidates(),
            words_per_caption: 4,
            overwrite: true,
        }
    }
}

impl RenderConfig {
    /// Load a config JSON file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::serde(format!("invalid render config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `ABSTRACT_REEL_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(THREADS_ENV).ok().as_deref(),
            std::env::var_os(FONT_ENV).map(PathBuf::from),
        )
    }

    pub(crate) fn with_overrides(mut self, threads: Option<&str>, font: Option<PathBuf>) -> Self {
        if let Some(n) = threads
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.threads = Some(n);
        }
        if let Some(font) = font.filter(|p| !p.as_os_str().is_empty()) {
            self.font_candidates.insert(0, font);
        }
        self
    }

    /// Reject values the renderer cannot honor.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.transition_window_secs.is_finite() || self.transition_window_secs < 0.0 {
            return Err(ReelError::validation(
                "transition_window_secs must be finite and >= 0",
            ));
        }
        if self.threads == Some(0) {
            return Err(ReelError::validation("threads must be >= 1 when set"));
        }
        if self.chunk_size == 0 {
            return Err(ReelError::validation("chunk_size must be >= 1"));
        }
        if self.words_per_caption == 0 {
            return Err(ReelError::validation("words_per_caption must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
