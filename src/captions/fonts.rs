use std::fmt;
use std::path::{Path, PathBuf};

/// Condensed or bold display faces, tried first.
const DISPLAY_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Impact.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansCondensed-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Impact.ttf",
    "C:\\Windows\\Fonts\\impact.ttf",
];

/// Generic bold faces.
const BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// CSS-style family list used when no candidate file loads.
pub const SYSTEM_FALLBACK_STACK: &str = "monospace, sans-serif";

/// Default candidate chain: display faces, then generic bold faces.
pub fn default_font_candidates() -> Vec<PathBuf> {
    DISPLAY_FONTS
        .iter()
        .chain(BOLD_FONTS)
        .map(PathBuf::from)
        .collect()
}

/// Font used for caption text, resolved once per render.
#[derive(Clone)]
pub enum FontChoice {
    /// A font file from the candidate chain.
    File {
        /// Where the bytes came from.
        path: PathBuf,
        /// Raw font file bytes, shared by all frame workers without copying.
        bytes: parley::fontique::Blob<u8>,
    },
    /// Whatever the platform font collection resolves for [`SYSTEM_FALLBACK_STACK`].
    ///
    /// Always available; on a host without any fonts captions render empty.
    SystemDefault,
}

impl FontChoice {
    /// Human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::File { path, .. } => path.display().to_string(),
            Self::SystemDefault => format!("system default ({SYSTEM_FALLBACK_STACK})"),
        }
    }
}

impl fmt::Debug for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, bytes } => f
                .debug_struct("File")
                .field("path", path)
                .field("len", &bytes.data().len())
                .finish(),
            Self::SystemDefault => f.write_str("SystemDefault"),
        }
    }
}

/// Walk `candidates` in order and take the first readable font file.
pub fn resolve_font(candidates: &[PathBuf]) -> FontChoice {
    for path in candidates {
        match load_font_file(path) {
            Ok(bytes) => {
                tracing::debug!(font = %path.display(), "caption font resolved");
                return FontChoice::File {
                    path: path.clone(),
                    bytes: parley::fontique::Blob::from(bytes),
                };
            }
            Err(reason) => {
                if path.exists() {
                    tracing::warn!(font = %path.display(), %reason, "skipping font candidate");
                } else {
                    tracing::trace!(font = %path.display(), "font candidate not present");
                }
            }
        }
    }
    tracing::info!("no caption font candidate loaded, using system default fonts");
    FontChoice::SystemDefault
}

fn load_font_file(path: &Path) -> Result<Vec<u8>, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    if !looks_like_font(&bytes) {
        return Err("not a TrueType/OpenType font".to_string());
    }
    Ok(bytes)
}

/// sfnt / collection magic check.
fn looks_like_font(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}

#[cfg(test)]
#[path = "../../tests/unit/captions/fonts.rs"]
mod tests;
