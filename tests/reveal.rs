use std::sync::Arc;

use sashcover::{DecodedImage, RasterImage, reveal::cut_column, reveal_composite};

fn striped(w: u32, h: u32) -> DecodedImage {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            let v = if x < w / 2 { 40 } else { 220 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    DecodedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(data),
    }
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> DecodedImage {
    DecodedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(px.repeat((w * h) as usize)),
    }
}

fn rgb(img: &RasterImage, x: u32, y: u32) -> [u8; 3] {
    let i = ((y * img.width + x) * 4) as usize;
    [img.rgba8[i], img.rgba8[i + 1], img.rgba8[i + 2]]
}

#[test]
fn frame_takes_before_size() {
    let before = solid(320, 200, [10, 10, 10, 255]);
    let after = solid(640, 400, [250, 250, 250, 255]);
    let img = reveal_composite(&before, &after, 25.0).unwrap();
    assert_eq!((img.width, img.height), (320, 200));
    let decoded = image::load_from_memory(&img.encoded.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (320, 200));
}

#[test]
fn zero_reveal_matches_before_exactly() {
    let before = striped(64, 32);
    let after = solid(64, 32, [0, 0, 255, 255]);
    let img = reveal_composite(&before, &after, 0.0).unwrap();
    assert_eq!(rgb(&img, 5, 10), [40, 40, 40]);
    assert_eq!(rgb(&img, 60, 10), [220, 220, 220]);
}

#[test]
fn divider_sits_on_the_cut() {
    let before = solid(200, 40, [255, 0, 0, 255]);
    let after = solid(200, 40, [0, 0, 255, 255]);
    let img = reveal_composite(&before, &after, 30.0).unwrap();
    let cut = cut_column(200, 30.0);
    assert_eq!(cut, 60);
    assert_eq!(rgb(&img, cut - 4, 20), [0, 0, 255]);
    assert_eq!(rgb(&img, cut, 20), [255, 255, 255]);
    assert_eq!(rgb(&img, cut - 1, 20), [255, 255, 255]);
    assert_eq!(rgb(&img, cut + 3, 20), [255, 0, 0]);
}

#[test]
fn out_of_range_positions_are_clamped() {
    let before = solid(50, 20, [255, 0, 0, 255]);
    let after = solid(50, 20, [0, 0, 255, 255]);
    let low = reveal_composite(&before, &after, -20.0).unwrap();
    let zero = reveal_composite(&before, &after, 0.0).unwrap();
    assert_eq!(low.pixel_digest(), zero.pixel_digest());

    let high = reveal_composite(&before, &after, 180.0).unwrap();
    let full = reveal_composite(&before, &after, 100.0).unwrap();
    assert_eq!(high.pixel_digest(), full.pixel_digest());
}
