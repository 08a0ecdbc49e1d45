use crate::foundation::core::Canvas;

/// Gap added below every caption line, in pixels.
pub const LINE_GAP_PX: u32 = 10;
/// Caption block width limit as a fraction of frame width.
pub const MAX_WIDTH_FRACTION: f32 = 0.8;
/// Caption block height limit as a fraction of frame height.
pub const MAX_HEIGHT_FRACTION: f32 = 0.4;
/// Caption block top edge as a fraction of frame height.
pub const TOP_FRACTION: f32 = 0.7;

/// Measures rendered text width. Implemented by the shaping engine and by test doubles.
pub trait TextMeasure {
    /// Advance width of `text` set on one line at `size_px`.
    fn line_width(&mut self, text: &str, size_px: f32) -> f32;
}

/// Limits for the font-size search, derived from the frame size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitBounds {
    /// Widest allowed line.
    pub max_width: f32,
    /// Tallest allowed block (`lines * (size + gap)`).
    pub max_height: f32,
    /// First size tried.
    pub start_size: u32,
    /// Last size tried, used even when nothing fits.
    pub min_size: u32,
}

impl FitBounds {
    /// `start = max(5% of height, 20)`, `min = max(40% of start, 12)`.
    pub fn for_canvas(canvas: Canvas) -> Self {
        let h = canvas.height as f32;
        let start_size = ((h * 0.05) as u32).max(20);
        let min_size = ((start_size as f32 * 0.4) as u32).max(12).min(start_size);
        Self {
            max_width: canvas.width as f32 * MAX_WIDTH_FRACTION,
            max_height: h * MAX_HEIGHT_FRACTION,
            start_size,
            min_size,
        }
    }
}

/// Chosen caption size and its wrapped lines.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionFit {
    /// Font size in pixels.
    pub font_size: u32,
    /// Wrapped lines, top to bottom.
    pub lines: Vec<String>,
}

impl CaptionFit {
    /// Vertical advance between line tops.
    pub fn line_advance(&self) -> u32 {
        self.font_size + LINE_GAP_PX
    }

    /// Total block height.
    pub fn block_height(&self) -> u32 {
        self.lines.len() as u32 * self.line_advance()
    }
}

/// Greedy word wrap: a word joins the current line while the line stays within `max_width`.
///
/// A single word wider than `max_width` gets a line of its own.
pub fn wrap_greedy(
    text: &str,
    max_width: f32,
    size_px: f32,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure.line_width(&candidate, size_px) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Largest size from `start_size` down to `min_size` whose wrapped block fits
/// `max_height`; `min_size` when none does.
pub fn fit_caption(text: &str, bounds: FitBounds, measure: &mut dyn TextMeasure) -> CaptionFit {
    let fits = |lines: &[String], size: u32| {
        (lines.len() as u32 * (size + LINE_GAP_PX)) as f32 <= bounds.max_height
    };

    let mut size = bounds.start_size;
    while size > bounds.min_size {
        let lines = wrap_greedy(text, bounds.max_width, size as f32, measure);
        if fits(&lines, size) {
            return CaptionFit {
                font_size: size,
                lines,
            };
        }
        size -= 1;
    }

    CaptionFit {
        font_size: bounds.min_size,
        lines: wrap_greedy(text, bounds.max_width, bounds.min_size as f32, measure),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/layout.rs"]
mod tests;
