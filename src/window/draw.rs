use kurbo::Shape as _;

use crate::{
    foundation::core::{Point, Rgba8, Vec2},
    foundation::error::SashResult,
    render::{FrameRGBA, ImageFormat, RasterImage, Shadow, Surface},
    window::geometry::{
        GRIP_HIGHLIGHT_WIDTH, GRIP_WIDTH, SashGeometry, WindowGeometry,
    },
};

pub const SAMPLE_JPEG_QUALITY: u8 = 95;

const WALL_TOP: Rgba8 = Rgba8::hex(0xf8fafc);
const WALL_BOTTOM: Rgba8 = Rgba8::hex(0xe2e8f0);
const FRAME_FILL: Rgba8 = Rgba8::hex(0xfdfdfd);
const CONTOUR: Rgba8 = Rgba8::hex(0xe2e8f0);
const RECESS: Rgba8 = Rgba8::hex(0xf1f5f9);
const SASH_BORDER: Rgba8 = Rgba8::hex(0xcbd5e1);
const GLASS_FROM: Rgba8 = Rgba8::hex(0xe0f2fe);
const GLASS_TO: Rgba8 = Rgba8::hex(0xdbeafe);
const GASKET: Rgba8 = Rgba8::hex(0x334155);
const HANDLE_BASE: Rgba8 = Rgba8::hex(0xcbd5e1);
const HANDLE_GRIP: Rgba8 = Rgba8::hex(0x94a3b8);
const HANDLE_SHEEN: Rgba8 = Rgba8::hex(0xf1f5f9);
const SILL: Rgba8 = Rgba8::hex(0x334155);
const SILL_EDGE: Rgba8 = Rgba8::hex(0x475569);

const PATH_TOLERANCE: f64 = 0.1;

/// Render the sample window and encode it as JPEG.
#[tracing::instrument]
pub fn render_synthetic_window() -> SashResult<RasterImage> {
    let frame = render_window_frame(&WindowGeometry::standard())?;
    RasterImage::encode(
        frame,
        ImageFormat::Jpeg {
            quality: SAMPLE_JPEG_QUALITY,
        },
    )
}

/// The sample window as a data URI, or an empty string if it could not be drawn.
pub fn sample_data_uri() -> String {
    match render_synthetic_window() {
        Ok(img) => img.to_data_uri(),
        Err(e) => {
            tracing::warn!(error = %e, "sample window unavailable");
            String::new()
        }
    }
}

pub fn render_window_frame(g: &WindowGeometry) -> SashResult<FrameRGBA> {
    let mut s = Surface::new(g.canvas.width, g.canvas.height)?;
    let full = g.canvas.rect();

    s.fill_rect_linear_gradient(
        full,
        Point::new(0.0, 0.0),
        Point::new(0.0, full.y1),
        WALL_TOP,
        WALL_BOTTOM,
    )?;

    s.drop_shadow(
        &g.outer.to_path(PATH_TOLERANCE),
        Shadow {
            color: Rgba8::black_alpha(0.2),
            blur: 30.0,
            offset: Vec2::new(0.0, 15.0),
        },
    )?;
    s.fill_rect(g.outer, Rgba8::WHITE);

    s.fill_rect(g.outer, FRAME_FILL);
    s.stroke_rect(g.outer, CONTOUR, 1.0);
    s.fill_rect(g.inner, RECESS);
    s.stroke_rect(g.inner, CONTOUR, 1.0);

    for sash in &g.sashes {
        draw_sash(&mut s, sash)?;
    }

    s.fill_rect(g.sill, SILL);
    s.fill_rect(g.sill_highlight, SILL_EDGE);

    s.finish()
}

fn draw_sash(s: &mut Surface, sash: &SashGeometry) -> SashResult<()> {
    s.fill_rect(sash.rect, Rgba8::WHITE);
    s.stroke_rect(sash.rect, SASH_BORDER, 1.0);
    s.stroke_path(&sash.miter_path(), CONTOUR, &kurbo::Stroke::new(1.0));

    let glass = sash.glass;
    s.fill_rect_linear_gradient(
        glass,
        Point::new(glass.x0, glass.y0),
        Point::new(glass.x1, glass.y1),
        GLASS_FROM,
        GLASS_TO,
    )?;
    s.stroke_rect(glass, GASKET, 1.0);

    let reflection = sash.reflection();
    s.with_clip(&glass.to_path(PATH_TOLERANCE), |s| {
        s.fill_path(&reflection, Rgba8::white_alpha(0.5));
    });

    s.fill_rect(sash.handle_base(), HANDLE_BASE);
    let round = |w: f64| {
        kurbo::Stroke::new(w)
            .with_caps(kurbo::Cap::Round)
            .with_join(kurbo::Join::Round)
    };
    s.stroke_path(&sash.grip_path(), HANDLE_GRIP, &round(GRIP_WIDTH));
    s.stroke_path(
        &sash.grip_highlight_path(),
        HANDLE_SHEEN,
        &round(GRIP_HIGHLIGHT_WIDTH),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(f: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * f.width + x) * 4) as usize;
        [f.data[i], f.data[i + 1], f.data[i + 2], f.data[i + 3]]
    }

    fn close(a: [u8; 4], hex: u32) -> bool {
        let e = Rgba8::hex(hex);
        [a[0].abs_diff(e.r), a[1].abs_diff(e.g), a[2].abs_diff(e.b)]
            .iter()
            .all(|&d| d <= 3)
            && a[3] == 255
    }

    #[test]
    fn frame_is_opaque_and_sized() {
        let f = render_window_frame(&WindowGeometry::standard()).unwrap();
        assert_eq!((f.width, f.height), (1200, 900));
        assert!(f.data.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn landmark_pixels_have_expected_colors() {
        let f = render_window_frame(&WindowGeometry::standard()).unwrap();
        // Sill body, below the highlight strip.
        assert!(close(px(&f, 600, 740), 0x334155));
        // Sill highlight.
        assert!(close(px(&f, 600, 727), 0x475569));
        // Outer frame band.
        assert!(close(px(&f, 370, 450), 0xfdfdfd));
        // Sash profile between recess edge and glass.
        assert!(close(px(&f, 410, 300), 0xffffff));
        // Wall corner, top of the gradient.
        assert!(close(px(&f, 2, 2), 0xf8fafc));
    }

    #[test]
    fn wall_gets_darker_toward_the_bottom() {
        let f = render_window_frame(&WindowGeometry::standard()).unwrap();
        assert!(px(&f, 50, 890)[0] < px(&f, 50, 10)[0]);
    }

    #[test]
    fn shadow_falls_below_the_window() {
        let f = render_window_frame(&WindowGeometry::standard()).unwrap();
        // Below the sill, inside the shadow falloff.
        let shadowed = px(&f, 600, 755);
        let open_wall = px(&f, 100, 755);
        assert!(shadowed[0] < open_wall[0]);
    }

    #[test]
    fn render_is_deterministic() {
        let a = render_synthetic_window().unwrap();
        let b = render_synthetic_window().unwrap();
        assert_eq!(a.pixel_digest(), b.pixel_digest());
        assert_eq!(a.encoded.bytes, b.encoded.bytes);
    }

    #[test]
    fn sample_data_uri_is_jpeg() {
        let uri = sample_data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }
}
