//! Before/after slider flattened into a single image.

use kurbo::Shape as _;

use crate::{
    assets::DecodedImage,
    foundation::core::{Rect, Rgba8},
    foundation::error::SashResult,
    render::{ImageFormat, RasterImage, Surface},
    sheet::layout::fit_image,
};

pub const REVEAL_BACKDROP: Rgba8 = Rgba8::hex(0xe2e8f0);
pub const DIVIDER_WIDTH: f64 = 4.0;
pub const REVEAL_JPEG_QUALITY: u8 = 90;

const PATH_TOLERANCE: f64 = 0.1;

/// Column where the after image gives way to the before image.
pub fn cut_column(width: u32, position_pct: f64) -> u32 {
    let pos = clamp_position(position_pct);
    (f64::from(width) * pos / 100.0).round() as u32
}

fn clamp_position(position_pct: f64) -> f64 {
    if position_pct.is_nan() {
        return 50.0;
    }
    position_pct.clamp(0.0, 100.0)
}

/// Show `after` left of `position_pct`% of the frame and `before` right of it.
///
/// The frame takes the size of `before`; both images are letterboxed into it.
#[tracing::instrument(skip(before, after), fields(w = before.width, h = before.height))]
pub fn reveal_composite(
    before: &DecodedImage,
    after: &DecodedImage,
    position_pct: f64,
) -> SashResult<RasterImage> {
    let pos = clamp_position(position_pct);
    let (w, h) = (before.width, before.height);
    let frame = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
    let cut = f64::from(cut_column(w, pos));

    let mut s = Surface::new(w, h)?;
    s.fill_rect(frame, REVEAL_BACKDROP);
    for (image, side) in [
        (after, Rect::new(0.0, 0.0, cut, frame.y1)),
        (before, Rect::new(cut, 0.0, frame.x1, frame.y1)),
    ] {
        if side.width() <= 0.0 {
            continue;
        }
        let dest = fit_image(image.width, image.height, frame);
        let mut drawn: SashResult<()> = Ok(());
        s.with_clip(&side.to_path(PATH_TOLERANCE), |s| {
            drawn = s.draw_image(image, dest);
        });
        drawn?;
    }
    if pos > 0.0 && pos < 100.0 {
        s.fill_rect(
            Rect::new(cut - DIVIDER_WIDTH / 2.0, 0.0, cut + DIVIDER_WIDTH / 2.0, frame.y1),
            Rgba8::WHITE,
        );
    }

    RasterImage::encode(
        s.finish()?,
        ImageFormat::Jpeg {
            quality: REVEAL_JPEG_QUALITY,
        },
    )
}
