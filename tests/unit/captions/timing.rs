use serde_json::json;

use super::*;

fn words(n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| json!({ "word": format!(" w{i} "), "start": i as f64 * 0.5, "end": i as f64 * 0.5 + 0.4 }))
        .collect();
    json!({ "text": "ignored", "word_timings": items })
}

#[test]
fn words_are_grouped_by_four() {
    let timing = TranscriptTiming::from_json(&words(10)).unwrap();
    assert_eq!(timing.words.len(), 10);
    assert_eq!(timing.words[0].word, "w0");
    assert!((timing.duration - 4.9).abs() < 1e-9);

    let caps = captions_from_timing(&timing, DEFAULT_WORDS_PER_CAPTION);
    assert_eq!(caps.len(), 3);
    assert_eq!(caps[0].text, "w0 w1 w2 w3");
    assert_eq!(caps[0].start, 0.0);
    assert!((caps[0].end - 1.9).abs() < 1e-9);
    assert_eq!(caps[2].text, "w8 w9");
}

#[test]
fn grouping_size_is_a_parameter() {
    let timing = TranscriptTiming::from_json(&words(6)).unwrap();
    assert_eq!(captions_from_timing(&timing, 1).len(), 6);
    assert_eq!(captions_from_timing(&timing, 0).len(), 6);
    assert_eq!(captions_from_timing(&timing, 100).len(), 1);
}

#[test]
fn alternate_keys_and_string_numbers_are_accepted() {
    let v = json!({
        "words": [
            { "text": "Hello", "start": "0.0", "end": "0.4" },
            { "word": "", "start": 0.4, "end": 0.5 },
            { "word": "there", "start": 0.5, "end": 0.9 }
        ],
        "duration": 1.25
    });
    let timing = TranscriptTiming::from_json(&v).unwrap();
    assert_eq!(timing.words.len(), 2);
    assert_eq!(timing.duration, 1.25);
    let caps = captions_from_timing(&timing, 4);
    assert_eq!(caps, vec![CaptionSegment::new(0.0, 0.9, "Hello there")]);
}

#[test]
fn segments_are_used_without_words() {
    let v = json!({
        "segments": [
            { "text": " First sentence. ", "start": 0.0, "end": 2.0, "avg_logprob": -0.2 },
            { "text": "", "start": 2.0, "end": 2.5 },
            { "text": "Second.", "start": 2.5, "end": 4.0, "no_speech_prob": "0.01" }
        ]
    });
    let timing = TranscriptTiming::from_json(&v).unwrap();
    assert_eq!(timing.segments[0].avg_logprob, Some(-0.2));
    assert_eq!(timing.segments[2].no_speech_prob, Some(0.01));
    let caps = captions_from_timing(&timing, 4);
    assert_eq!(caps.len(), 2);
    assert_eq!(caps[0].text, "First sentence.");
    assert_eq!(caps[1].start, 2.5);
}

#[test]
fn malformed_payloads_are_serde_errors() {
    assert!(TranscriptTiming::from_json(&json!([1, 2])).is_err());
    assert!(TranscriptTiming::from_json(&json!({ "words": 3 })).is_err());
    let missing_end = json!({ "words": [ { "word": "x", "start": 0.0 } ] });
    let err = TranscriptTiming::from_json(&missing_end).unwrap_err();
    assert!(err.to_string().contains("word 0"));
    assert!(err.to_string().contains("'end'"));
}

#[test]
fn sample_captions_split_evenly() {
    let caps = sample_captions(&["a", "b", "c"], 7.5);
    assert_eq!(caps.len(), 3);
    assert_eq!(caps[1], CaptionSegment::new(2.5, 5.0, "b"));
    assert_eq!(caps[2].end, 7.5);
    assert!(sample_captions::<&str>(&[], 10.0).is_empty());
}

#[test]
fn plain_arrays_and_transcripts_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let arr = dir.path().join("captions.json");
    std::fs::write(
        &arr,
        r#"[{"start":0.0,"end":2.5,"text":"Scientists have discovered"}]"#,
    )
    .unwrap();
    let caps = load_captions(&arr, 4).unwrap();
    assert_eq!(caps[0].text, "Scientists have discovered");

    let transcript = dir.path().join("timing.json");
    std::fs::write(&transcript, words(5).to_string()).unwrap();
    assert_eq!(load_captions(&transcript, 4).unwrap().len(), 2);

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{").unwrap();
    assert!(matches!(
        load_captions(&broken, 4).unwrap_err(),
        ReelError::Serde(_)
    ));
}
