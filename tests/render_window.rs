use sashcover::{ImageFormat, WindowGeometry, render_synthetic_window};

#[test]
fn sample_window_is_deterministic() {
    let a = render_synthetic_window().unwrap();
    let b = render_synthetic_window().unwrap();
    assert_eq!(a.pixel_digest(), b.pixel_digest());
}

#[test]
fn sample_window_decodes_as_1200x900_jpeg() {
    let img = render_synthetic_window().unwrap();
    assert_eq!(img.format, ImageFormat::Jpeg { quality: 95 });
    assert_eq!(img.encoded.mime_type, "image/jpeg");

    let decoded = image::load_from_memory_with_format(
        &img.encoded.bytes,
        image::ImageFormat::Jpeg,
    )
    .unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1200, 900));
}

#[test]
fn sample_data_uri_round_trips_through_decode() {
    let uri = sashcover::sample_data_uri();
    let encoded = sashcover::EncodedImage::from_data_uri(&uri).unwrap();
    let decoded = sashcover::decode_image(&encoded.bytes).unwrap();
    assert_eq!((decoded.width, decoded.height), (1200, 900));
}

#[test]
fn geometry_invariants_hold() {
    let g = WindowGeometry::standard();
    assert_eq!(g.sash_width * 2.0 + 4.0, g.inner.width());

    let [left, right] = &g.sashes;
    assert_eq!(left.rect.size(), right.rect.size());
    for sash in [left, right] {
        let (r, gl) = (sash.rect, sash.glass);
        assert!(gl.x0 > r.x0 && gl.y0 > r.y0 && gl.x1 < r.x1 && gl.y1 < r.y1);
        assert_eq!(gl.x0 - r.x0, 45.0);
        assert_eq!(r.y1 - gl.y1, 45.0);
    }

    assert_eq!(g.sill.width(), g.outer.width() + 20.0);
    assert_eq!(g.sill.y0, g.outer.y1);
}

#[test]
fn handles_are_mirrored() {
    let g = WindowGeometry::standard();
    let [left, right] = &g.sashes;
    assert_eq!(left.side.direction(), -right.side.direction());
    let center = g.outer.center().x;
    assert_eq!(center - left.handle.x, right.handle.x - center);
    assert_eq!(left.handle.y, right.handle.y);
}
