use super::*;

const CANVAS: Canvas = Canvas {
    width: 8,
    height: 8,
};

fn composer(captions: Vec<CaptionSegment>) -> FrameComposer {
    let planner = TimelinePlanner::new(3.0, 3, 0.5).unwrap();
    let images = vec![
        FrameRGBA::solid(CANVAS, [255, 0, 0]),
        FrameRGBA::solid(CANVAS, [0, 255, 0]),
        FrameRGBA::solid(CANVAS, [0, 0, 255]),
    ];
    FrameComposer::new(planner, CANVAS, images, captions.into(), FontChoice::SystemDefault)
        .unwrap()
}

#[test]
fn holds_primary_outside_transitions() {
    let c = composer(vec![]);
    assert_eq!(c.background(0.2).unwrap().pixel(3, 3).unwrap(), [255, 0, 0, 255]);
    assert_eq!(c.background(1.2).unwrap().pixel(0, 0).unwrap(), [0, 255, 0, 255]);
    assert_eq!(c.background(2.99).unwrap().pixel(7, 7).unwrap(), [0, 0, 255, 255]);
}

#[test]
fn blends_inside_transition_window() {
    let c = composer(vec![]);
    let px = c.background(0.75).unwrap().pixel(4, 4).unwrap();
    assert!((120..=135).contains(&px[0]), "{px:?}");
    assert!((120..=135).contains(&px[1]), "{px:?}");
    assert_eq!(px[2], 0);
    assert_eq!(px[3], 255);
}

#[test]
fn worker_without_active_caption_matches_background() {
    let c = composer(vec![CaptionSegment::new(2.5, 2.9, "late")]);
    let mut w = c.worker();
    assert_eq!(w.compose(0.3).unwrap(), c.background(0.3).unwrap());
}

#[test]
fn rejects_wrong_image_count_or_size() {
    let planner = TimelinePlanner::new(3.0, 3, 0.5).unwrap();
    let two = vec![FrameRGBA::solid(CANVAS, [0, 0, 0]); 2];
    let err = FrameComposer::new(planner, CANVAS, two, Vec::new().into(), FontChoice::SystemDefault)
        .err()
        .unwrap();
    assert!(err.is_validation());

    let mut three = vec![FrameRGBA::solid(CANVAS, [0, 0, 0]); 3];
    three[1] = FrameRGBA::solid(
        Canvas {
            width: 4,
            height: 4,
        },
        [0, 0, 0],
    );
    assert!(
        FrameComposer::new(planner, CANVAS, three, Vec::new().into(), FontChoice::SystemDefault)
            .is_err()
    );
}
