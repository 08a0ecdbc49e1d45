use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Named output quality tier.
///
/// Every tier is 9:16 portrait; lower tiers scale both dimensions down.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// 540x960 at 24 fps.
    Low,
    /// 720x1280 at 30 fps.
    #[default]
    Medium,
    /// 1080x1920 at 30 fps.
    High,
}

/// Resolved output geometry and frame rate for a [`QualityPreset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresetSpec {
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
}

impl QualityPreset {
    /// All tiers, lowest first.
    pub const ALL: [QualityPreset; 3] = [Self::Low, Self::Medium, Self::High];

    /// Resolve the tier to its fixed resolution and frame rate.
    pub fn spec(self) -> PresetSpec {
        let (width, height, fps) = match self {
            Self::Low => (540, 960, 24),
            Self::Medium => (720, 1280, 30),
            Self::High => (1080, 1920, 30),
        };
        PresetSpec {
            canvas: Canvas { width, height },
            fps: Fps { num: fps, den: 1 },
        }
    }

    /// Lowercase tier name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for QualityPreset {
    type Err = ReelError;

    fn from_str(s: &str) -> ReelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ReelError::validation(format!(
                "unknown quality preset '{other}' (expected low, medium or high)"
            ))),
        }
    }
}

impl std::fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/presets.rs"]
mod tests;
