use super::*;

/// Every character advances `0.6 * size`.
struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn line_width(&mut self, text: &str, size_px: f32) -> f32 {
        text.chars().count() as f32 * size_px * 0.6
    }
}

const HIGH: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

#[test]
fn bounds_follow_frame_size() {
    let b = FitBounds::for_canvas(HIGH);
    assert_eq!(b.start_size, 96);
    assert_eq!(b.min_size, 38);
    assert_eq!(b.max_width, 864.0);
    assert_eq!(b.max_height, 768.0);

    let small = FitBounds::for_canvas(Canvas {
        width: 90,
        height: 160,
    });
    assert_eq!(small.start_size, 20);
    assert_eq!(small.min_size, 12);
}

#[test]
fn greedy_wrap_fills_lines_in_order() {
    // 10 chars at size 10 = 60px.
    let lines = wrap_greedy("aaaa bbbb cccc dddd", 60.0, 10.0, &mut FixedAdvance);
    assert_eq!(lines, vec!["aaaa bbbb", "cccc dddd"]);
}

#[test]
fn overlong_word_stands_alone() {
    let lines = wrap_greedy("a supercalifragilistic b", 30.0, 10.0, &mut FixedAdvance);
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    assert!(wrap_greedy("   ", 30.0, 10.0, &mut FixedAdvance).is_empty());
}

#[test]
fn short_caption_keeps_start_size() {
    let fit = fit_caption("Hello world", FitBounds::for_canvas(HIGH), &mut FixedAdvance);
    assert_eq!(fit.font_size, 96);
    assert_eq!(fit.lines, vec!["Hello world"]);
    assert_eq!(fit.line_advance(), 106);
}

#[test]
fn long_caption_shrinks_until_it_fits() {
    let bounds = FitBounds {
        max_width: 100.0,
        max_height: 60.0,
        start_size: 30,
        min_size: 5,
    };
    let fit = fit_caption("one two three four", bounds, &mut FixedAdvance);
    assert!(fit.block_height() as f32 <= bounds.max_height);
    assert!(fit.font_size < 30);
    // Nothing one size larger fits.
    let bigger = wrap_greedy(
        "one two three four",
        bounds.max_width,
        (fit.font_size + 1) as f32,
        &mut FixedAdvance,
    );
    assert!((bigger.len() as u32 * (fit.font_size + 1 + LINE_GAP_PX)) as f32 > bounds.max_height);
}

#[test]
fn search_terminates_at_minimum_when_nothing_fits() {
    let text = "word ".repeat(400);
    let bounds = FitBounds::for_canvas(HIGH);
    let fit = fit_caption(&text, bounds, &mut FixedAdvance);
    assert_eq!(fit.font_size, bounds.min_size);
    assert!(fit.block_height() as f32 > bounds.max_height);
    assert!(!fit.lines.is_empty());
}
