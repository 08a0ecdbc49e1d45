use super::*;

#[test]
fn defaults_validate() {
    let cfg = RenderConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.transition_window_secs, 0.5);
    assert_eq!(cfg.words_per_caption, 4);
    assert!(!cfg.font_candidates.is_empty());
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = RenderConfig::from_json_str(r#"{ "chunk_size": 8, "threads": 2 }"#).unwrap();
    assert_eq!(cfg.chunk_size, 8);
    assert_eq!(cfg.threads, Some(2));
    assert_eq!(cfg.transition_window_secs, 0.5);
}

#[test]
fn bad_values_are_rejected() {
    assert!(RenderConfig::from_json_str(r#"{ "chunk_size": 0 }"#).is_err());
    assert!(RenderConfig::from_json_str(r#"{ "threads": 0 }"#).is_err());
    assert!(RenderConfig::from_json_str(r#"{ "transition_window_secs": -1.0 }"#).is_err());
    assert!(RenderConfig::from_json_str(r#"{ "nope": 1 }"#).is_err());
}

#[test]
fn overrides_prepend_font_and_set_threads() {
    let cfg = RenderConfig::default()
        .with_overrides(Some("3"), Some(PathBuf::from("/tmp/Custom-Bold.ttf")));
    assert_eq!(cfg.threads, Some(3));
    assert_eq!(cfg.font_candidates[0], PathBuf::from("/tmp/Custom-Bold.ttf"));

    let cfg = RenderConfig::default().with_overrides(Some("zero"), None);
    assert_eq!(cfg.threads, None);
}
