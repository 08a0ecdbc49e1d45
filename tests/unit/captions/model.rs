use super::*;

#[test]
fn well_formed_batch_passes() {
    let caps = vec![
        CaptionSegment::new(0.0, 2.0, "Hello"),
        CaptionSegment::new(2.0, 4.0, "World"),
    ];
    validate_captions(&caps).unwrap();
    assert_eq!(max_caption_end(&caps), Some(4.0));
}

#[test]
fn empty_batch_is_rejected() {
    let err = validate_captions(&[]).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("empty"));
    assert_eq!(max_caption_end(&[]), None);
}

#[test]
fn zero_length_caption_is_rejected() {
    let caps = vec![
        CaptionSegment::new(0.0, 1.0, "ok"),
        CaptionSegment::new(1.5, 1.5, "instant"),
    ];
    let err = validate_captions(&caps).unwrap_err();
    assert!(err.to_string().contains("caption 1"));
}

#[test]
fn reversed_negative_blank_and_nan_are_rejected() {
    assert!(validate_captions(&[CaptionSegment::new(2.0, 1.0, "x")]).is_err());
    assert!(validate_captions(&[CaptionSegment::new(-0.5, 1.0, "x")]).is_err());
    assert!(validate_captions(&[CaptionSegment::new(0.0, 1.0, "   ")]).is_err());
    assert!(validate_captions(&[CaptionSegment::new(f64::NAN, 1.0, "x")]).is_err());
}

#[test]
fn bounds_are_inclusive() {
    let c = CaptionSegment::new(1.0, 2.0, "x");
    assert!(c.contains(1.0));
    assert!(c.contains(2.0));
    assert!(!c.contains(2.0001));
    assert_eq!(c.duration(), 1.0);
}
