use super::*;

#[test]
fn every_tier_is_nine_by_sixteen_and_even() {
    for preset in QualityPreset::ALL {
        let spec = preset.spec();
        assert_eq!(spec.canvas.width * 16, spec.canvas.height * 9, "{preset}");
        spec.canvas.validate().unwrap();
        assert!(spec.fps.num > 0);
    }
}

#[test]
fn high_is_the_design_center() {
    let spec = QualityPreset::High.spec();
    assert_eq!((spec.canvas.width, spec.canvas.height), (1080, 1920));
    assert_eq!(spec.fps.num, 30);
    assert_eq!(QualityPreset::default(), QualityPreset::Medium);
}

#[test]
fn parses_names_case_insensitively() {
    assert_eq!("HIGH".parse::<QualityPreset>().unwrap(), QualityPreset::High);
    assert_eq!(" low ".parse::<QualityPreset>().unwrap(), QualityPreset::Low);
    assert!("ultra".parse::<QualityPreset>().is_err());
}

#[test]
fn serde_uses_lowercase_names() {
    let v: QualityPreset = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(v, QualityPreset::Medium);
    assert_eq!(serde_json::to_string(&QualityPreset::Low).unwrap(), "\"low\"");
}
