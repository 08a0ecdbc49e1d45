use std::sync::Arc;

use super::*;

fn solid(width: u32, height: u32, px: [u8; 4]) -> SourceImage {
    SourceImage {
        width,
        height,
        rgba: Arc::new(image::RgbaImage::from_pixel(width, height, image::Rgba(px))),
    }
}

const PORTRAIT: Canvas = Canvas {
    width: 90,
    height: 160,
};

#[test]
fn wide_source_is_cropped_horizontally() {
    let r = center_crop_rect(1600, 900, PORTRAIT);
    assert_eq!(r.height, 900);
    assert_eq!(r.width, 506);
    assert_eq!(r.y, 0);
    assert_eq!(r.x, (1600 - 506) / 2);
}

#[test]
fn tall_source_is_cropped_vertically() {
    let r = center_crop_rect(90, 400, PORTRAIT);
    assert_eq!(r.width, 90);
    assert_eq!(r.height, 160);
    assert_eq!(r.x, 0);
    assert_eq!(r.y, 120);
}

#[test]
fn matching_aspect_keeps_everything() {
    let r = center_crop_rect(180, 320, PORTRAIT);
    assert_eq!(
        r,
        CropRect {
            x: 0,
            y: 0,
            width: 180,
            height: 320
        }
    );
}

#[test]
fn prepared_frame_fills_canvas_exactly() {
    for (w, h) in [(1024, 1024), (1792, 1024), (300, 2000), (90, 160)] {
        let frame = prepare_frame(&solid(w, h, [10, 200, 30, 255]), PORTRAIT).unwrap();
        assert_eq!((frame.width, frame.height), (90, 160));
        assert_eq!(frame.data.len(), 90 * 160 * 4);
        let center = frame.pixel(45, 80).unwrap();
        assert!(center[1] > 190, "{center:?}");
        assert_eq!(center[3], 255);
    }
}

#[test]
fn crop_keeps_the_middle_of_a_wide_image() {
    // Left and right thirds red, middle green: a portrait crop only sees green.
    let mut img = image::RgbaImage::from_pixel(300, 100, image::Rgba([255, 0, 0, 255]));
    for y in 0..100 {
        for x in 100..200 {
            img.put_pixel(x, y, image::Rgba([0, 255, 0, 255]));
        }
    }
    let src = SourceImage {
        width: 300,
        height: 100,
        rgba: Arc::new(img),
    };
    let frame = prepare_frame(&src, Canvas { width: 50, height: 100 }).unwrap();
    let px = frame.pixel(25, 50).unwrap();
    assert!(px[1] > 200 && px[0] < 40, "{px:?}");
}

#[test]
fn transparent_pixels_flatten_to_black() {
    let frame = prepare_frame(&solid(9, 16, [255, 255, 255, 0]), PORTRAIT).unwrap();
    assert_eq!(frame.pixel(10, 10).unwrap(), [0, 0, 0, 255]);
}
