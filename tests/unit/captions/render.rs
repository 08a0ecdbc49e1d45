use super::*;

use crate::captions::fonts::{default_font_candidates, resolve_font};

fn seg(start: f64, end: f64, text: &str) -> CaptionSegment {
    CaptionSegment::new(start, end, text)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn middle_of_caption_is_fully_opaque() {
    let caps = [seg(0.0, 2.0, "Hello world")];
    let state = caption_state(&caps, 1.0).unwrap();
    assert_eq!(state.index, 0);
    assert!(approx(state.alpha, 1.0));
}

#[test]
fn fade_in_is_linear_over_first_tenth() {
    let c = seg(0.0, 2.0, "Hello world");
    assert!(approx(fade_alpha(&c, 0.05), 0.25));
    assert!(approx(fade_alpha(&c, 0.0), 0.0));
    assert!(approx(fade_alpha(&c, 0.1), 0.5));
}

#[test]
fn fade_out_is_linear_over_last_tenth() {
    let c = seg(0.0, 2.0, "x");
    assert!(approx(fade_alpha(&c, 1.9), 0.5));
    assert!(approx(fade_alpha(&c, 2.0), 0.0));
}

#[test]
fn envelope_is_continuous_at_the_knees() {
    let c = seg(1.0, 3.0, "x");
    let eps = 1e-7;
    for knee in [1.2, 2.8] {
        let below = fade_alpha(&c, knee - eps);
        let above = fade_alpha(&c, knee + eps);
        assert!((below - above).abs() < 1e-4, "jump at {knee}: {below} vs {above}");
        assert!(approx(fade_alpha(&c, knee), 1.0));
    }
}

#[test]
fn alpha_stays_in_unit_range() {
    let c = seg(0.5, 1.5, "x");
    for i in 0..=40 {
        let t = 0.4 + f64::from(i) * 0.03;
        let a = fade_alpha(&c, t);
        assert!((0.0..=1.0).contains(&a), "alpha {a} at {t}");
    }
}

#[test]
fn overlapping_captions_pick_the_first_listed() {
    let caps = [seg(0.0, 2.0, "first"), seg(1.0, 3.0, "second")];
    let (i, c) = select_caption(&caps, 1.5).unwrap();
    assert_eq!(i, 0);
    assert_eq!(c.text, "first");
    assert_eq!(select_caption(&caps, 2.5).unwrap().0, 1);
}

#[test]
fn bounds_are_inclusive_and_gaps_are_empty() {
    let caps = [seg(0.0, 1.0, "a"), seg(2.0, 3.0, "b")];
    assert_eq!(select_caption(&caps, 1.0).unwrap().0, 0);
    assert_eq!(select_caption(&caps, 2.0).unwrap().0, 1);
    assert!(select_caption(&caps, 1.5).is_none());
    assert!(caption_state(&caps, 3.5).is_none());
}

#[test]
fn outline_offsets_cover_two_rings() {
    let (outer, inner) = OUTLINE_OFFSETS.split_at(8);
    assert!(outer.iter().all(|&(dx, dy)| dx.abs().max(dy.abs()) == 3));
    assert!(inner.iter().all(|&(dx, dy)| dx.abs().max(dy.abs()) == 2));
    assert!(!OUTLINE_OFFSETS.contains(&(0, 0)));
}

#[test]
fn frame_without_active_caption_is_untouched() {
    let canvas = Canvas {
        width: 16,
        height: 16,
    };
    let caps: Arc<[CaptionSegment]> = vec![seg(5.0, 6.0, "later")].into();
    let mut renderer = CaptionRenderer::new(caps, canvas, &FontChoice::SystemDefault);
    let frame = FrameRGBA::solid(canvas, [10, 20, 30]);
    let out = renderer.render(frame.clone(), 1.0).unwrap();
    assert_eq!(out, frame);
    assert_eq!(renderer.captions().len(), 1);
}

fn file_font() -> Option<FontChoice> {
    let font = resolve_font(&default_font_candidates());
    if matches!(font, FontChoice::File { .. }) {
        Some(font)
    } else {
        eprintln!("no caption font file on this host; skipping glyph raster checks");
        None
    }
}

fn changed_rows(frame: &FrameRGBA, base: &FrameRGBA) -> Vec<u32> {
    let row_len = frame.width as usize * 4;
    frame
        .data
        .chunks_exact(row_len)
        .zip(base.data.chunks_exact(row_len))
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(y, _)| y as u32)
        .collect()
}

#[test]
fn active_caption_draws_outlined_text_in_the_lower_band() {
    let Some(font) = file_font() else {
        return;
    };
    let canvas = Canvas {
        width: 540,
        height: 960,
    };
    let caps: Arc<[CaptionSegment]> = vec![seg(0.0, 2.0, "Hello world")].into();
    let mut renderer = CaptionRenderer::new(caps, canvas, &font);
    let gray = FrameRGBA::solid(canvas, [128, 128, 128]);
    let band_top = (960.0 * TOP_FRACTION) as u32 - 8;

    let full = renderer.render(gray.clone(), 1.0).unwrap();
    let rows = changed_rows(&full, &gray);
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|&y| y >= band_top), "drawn above the band: {rows:?}");
    let reds: Vec<u8> = full.data.chunks_exact(4).map(|px| px[0]).collect();
    assert!(reds.iter().filter(|&&r| r >= 250).count() > 100, "no white fill");
    assert!(reds.iter().filter(|&&r| r <= 5).count() > 100, "no black outline");
    assert!(full.data.chunks_exact(4).all(|px| px[3] == 255));

    let quarter = renderer.render(gray.clone(), 0.05).unwrap();
    assert!(changed_rows(&quarter, &gray).iter().all(|&y| y >= band_top));
    let max = quarter.data.chunks_exact(4).map(|px| px[0]).max().unwrap();
    let min = quarter.data.chunks_exact(4).map(|px| px[0]).min().unwrap();
    assert!((158..=161).contains(&max), "quarter-alpha fill {max}");
    assert!((95..=97).contains(&min), "quarter-alpha outline {min}");

    let gone = renderer.render(gray.clone(), 2.0).unwrap();
    assert_eq!(gone, gray);
}

#[test]
fn renderers_sharing_bands_rasterize_once() {
    let canvas = Canvas {
        width: 64,
        height: 64,
    };
    let caps: Arc<[CaptionSegment]> =
        vec![seg(0.0, 2.0, "shared"), seg(3.0, 4.0, "later")].into();
    let bands = Arc::new(CaptionBands::new(caps, canvas, FontChoice::SystemDefault));
    let mut a = CaptionRenderer::with_bands(Arc::clone(&bands));
    let mut b = CaptionRenderer::with_bands(Arc::clone(&bands));
    let frame = FrameRGBA::solid(canvas, [10, 10, 10]);

    let from_a = a.render(frame.clone(), 1.0).unwrap();
    let from_b = b.render(frame.clone(), 1.0).unwrap();
    assert_eq!(from_a, from_b);
    a.render(frame.clone(), 1.5).unwrap();
    assert_eq!(bands.rasterized(), 1);

    b.render(frame, 3.5).unwrap();
    assert_eq!(bands.rasterized(), 2);
}
