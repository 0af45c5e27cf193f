//! CPU drawing surface used by every renderer in the crate.
//!
//! Vector work is recorded into a `vello_cpu` context and flattened onto an
//! accumulated premultiplied buffer whenever an effect needs the pixels
//! (drop shadows) or when the surface is finished.

use std::sync::Arc;

use kurbo::Shape as _;

use crate::{
    assets::DecodedImage,
    blur_cpu, composite_cpu,
    foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Vec2},
    foundation::error::{SashError, SashResult},
    render::FrameRGBA,
};

const PATH_TOLERANCE: f64 = 0.1;

/// Canvas-style drop shadow: a blurred, offset silhouette drawn beneath a shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba8,
    /// Blur extent in pixels. The Gaussian sigma is half of it.
    pub blur: f64,
    pub offset: Vec2,
}

pub struct Surface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pending: bool,
    base: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> SashResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| SashError::surface(format!("surface width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| SashError::surface(format!("surface height {height} exceeds u16")))?;
        if w == 0 || h == 0 {
            return Err(SashError::surface(format!(
                "surface must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pending: false,
            base: vec![0u8; usize::from(w) * usize::from(h) * 4],
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        let ctx = self.begin(Affine::IDENTITY);
        ctx.set_paint(color.to_cpu());
        ctx.fill_rect(&rect_to_cpu(rect));
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        let ctx = self.begin(Affine::IDENTITY);
        ctx.set_paint(color.to_cpu());
        ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke centered on the path outline, like a canvas `stroke()`.
    pub fn stroke_path(&mut self, path: &BezPath, color: Rgba8, style: &kurbo::Stroke) {
        let outline = kurbo::stroke(
            path.iter(),
            style,
            &kurbo::StrokeOpts::default(),
            PATH_TOLERANCE,
        );
        self.fill_path(&outline, color);
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba8, width: f64) {
        self.stroke_path(
            &rect.to_path(PATH_TOLERANCE),
            color,
            &kurbo::Stroke::new(width),
        );
    }

    /// Fill `rect` with a two-stop linear gradient running from `start` to `end`.
    pub fn fill_rect_linear_gradient(
        &mut self,
        rect: Rect,
        start: Point,
        end: Point,
        from: Rgba8,
        to: Rgba8,
    ) -> SashResult<()> {
        let w = rect.width().ceil().max(1.0) as u32;
        let h = rect.height().ceil().max(1.0) as u32;
        let axis = end - start;
        let len2 = axis.hypot2();

        let mut bytes = vec![0u8; (w as usize) * (h as usize) * 4];
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(
                    rect.x0 + f64::from(x) + 0.5,
                    rect.y0 + f64::from(y) + 0.5,
                );
                let t = if len2 <= f64::EPSILON {
                    0.0
                } else {
                    ((p - start).dot(axis) / len2) as f32
                };
                let idx = ((y as usize) * (w as usize) + x as usize) * 4;
                bytes[idx..idx + 4].copy_from_slice(&from.lerp(to, t).premul());
            }
        }

        let paint = image_paint(&bytes, w, h)?;
        let ctx = self.begin(Affine::translate((rect.x0, rect.y0)));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            rect.width(),
            rect.height(),
        ));
        Ok(())
    }

    /// Draw `image` stretched to `dest`. Callers keep the aspect ratio themselves.
    pub fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> SashResult<()> {
        let paint = image_paint(image.rgba8_premul.as_slice(), image.width, image.height)?;
        let sx = dest.width() / f64::from(image.width);
        let sy = dest.height() / f64::from(image.height);
        let ctx = self.begin(
            Affine::translate((dest.x0, dest.y0)) * Affine::scale_non_uniform(sx, sy),
        );
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        Ok(())
    }

    /// Run `draw` with everything clipped to `clip`.
    ///
    /// Shadows flatten the surface and must not be drawn inside the closure.
    pub fn with_clip(&mut self, clip: &BezPath, draw: impl FnOnce(&mut Self)) {
        let ctx = self.begin(Affine::IDENTITY);
        ctx.push_clip_layer(&bezpath_to_cpu(clip));
        draw(self);
        self.ctx.pop_layer();
    }

    /// Paint the blurred silhouette of `shape` beneath whatever is drawn next.
    pub fn drop_shadow(&mut self, shape: &BezPath, shadow: Shadow) -> SashResult<()> {
        self.flush()?;

        let sigma = (shadow.blur / 2.0) as f32;
        let radius = blur_cpu::radius_for_sigma(sigma);
        let pad = f64::from(radius);
        let bbox = shape.bounding_box() + shadow.offset;
        let x0 = (bbox.x0 - pad).floor();
        let y0 = (bbox.y0 - pad).floor();
        let mw = ((bbox.x1 + pad).ceil() - x0).max(1.0) as u32;
        let mh = ((bbox.y1 + pad).ceil() - y0).max(1.0) as u32;
        let (mw16, mh16): (u16, u16) = match (mw.try_into(), mh.try_into()) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(SashError::surface(format!(
                    "shadow mask too large: {mw}x{mh}"
                )));
            }
        };

        let mut ctx = vello_cpu::RenderContext::new(mw16, mh16);
        ctx.set_transform(affine_to_cpu(Affine::translate((
            shadow.offset.x - x0,
            shadow.offset.y - y0,
        ))));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_path(&bezpath_to_cpu(shape));
        ctx.flush();
        let mut mask_px = vello_cpu::Pixmap::new(mw16, mh16);
        ctx.render_to_pixmap(&mut mask_px);

        let coverage: Vec<u8> = mask_px
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();
        let blurred = blur_cpu::blur_alpha8(&coverage, mw, mh, radius, sigma)?;

        let (w, h) = (self.width(), self.height());
        composite_cpu::tint_mask_over(
            &mut self.base,
            w,
            h,
            &blurred,
            mw,
            x0 as i32,
            y0 as i32,
            shadow.color.premul(),
        )
    }

    pub fn glyph_context(&mut self, transform: Affine) -> &mut vello_cpu::RenderContext {
        self.begin(transform)
    }

    /// Flatten recorded drawing onto the accumulated pixels.
    pub fn flush(&mut self) -> SashResult<()> {
        if !self.pending {
            return Ok(());
        }
        self.ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut layer);
        composite_cpu::over_in_place(&mut self.base, layer.data_as_u8_slice(), 1.0)?;
        self.ctx.reset();
        self.pending = false;
        Ok(())
    }

    pub fn finish(mut self) -> SashResult<FrameRGBA> {
        self.flush()?;
        Ok(FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.base,
            premultiplied: true,
        })
    }

    fn begin(&mut self, transform: Affine) -> &mut vello_cpu::RenderContext {
        self.pending = true;
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        &mut self.ctx
    }
}

fn image_paint(rgba8_premul: &[u8], width: u32, height: u32) -> SashResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> SashResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SashError::surface("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SashError::surface("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(SashError::validation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Shape as _;

    use super::*;

    fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * frame.width + x) * 4) as usize;
        [
            frame.data[i],
            frame.data[i + 1],
            frame.data[i + 2],
            frame.data[i + 3],
        ]
    }

    #[test]
    fn surface_rejects_empty_and_oversized() {
        assert!(matches!(
            Surface::new(0, 10),
            Err(SashError::SurfaceUnavailable(_))
        ));
        assert!(matches!(
            Surface::new(70_000, 10),
            Err(SashError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn fill_rect_covers_interior_only() {
        let mut s = Surface::new(16, 16).unwrap();
        s.fill_rect(Rect::new(4.0, 4.0, 12.0, 12.0), Rgba8::hex(0xff0000));
        let f = s.finish().unwrap();
        assert_eq!(px(&f, 8, 8), [255, 0, 0, 255]);
        assert_eq!(px(&f, 1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn later_draws_cover_earlier_layers() {
        let mut s = Surface::new(8, 8).unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::hex(0x0000ff));
        s.flush().unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 4.0, 8.0), Rgba8::hex(0x00ff00));
        let f = s.finish().unwrap();
        assert_eq!(px(&f, 1, 4), [0, 255, 0, 255]);
        assert_eq!(px(&f, 6, 4), [0, 0, 255, 255]);
    }

    #[test]
    fn vertical_gradient_runs_top_to_bottom() {
        let mut s = Surface::new(4, 64).unwrap();
        s.fill_rect_linear_gradient(
            Rect::new(0.0, 0.0, 4.0, 64.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 64.0),
            Rgba8::hex(0x000000),
            Rgba8::hex(0xffffff),
        )
        .unwrap();
        let f = s.finish().unwrap();
        assert!(px(&f, 2, 2)[0] < 20);
        assert!(px(&f, 2, 61)[0] > 235);
    }

    #[test]
    fn drop_shadow_darkens_offset_region() {
        let mut s = Surface::new(64, 64).unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 64.0, 64.0), Rgba8::WHITE);
        let shape = Rect::new(16.0, 16.0, 32.0, 32.0).to_path(0.1);
        s.drop_shadow(
            &shape,
            Shadow {
                color: Rgba8::black_alpha(0.5),
                blur: 4.0,
                offset: Vec2::new(0.0, 16.0),
            },
        )
        .unwrap();
        let f = s.finish().unwrap();
        assert!(px(&f, 24, 40)[0] < 200);
        assert_eq!(px(&f, 2, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn drop_shadow_past_the_edge_is_clipped() {
        let mut s = Surface::new(32, 32).unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 32.0, 32.0), Rgba8::WHITE);
        let shape = Rect::new(20.0, 20.0, 40.0, 40.0).to_path(0.1);
        s.drop_shadow(
            &shape,
            Shadow {
                color: Rgba8::black_alpha(0.4),
                blur: 6.0,
                offset: Vec2::new(8.0, 8.0),
            },
        )
        .unwrap();
        let f = s.finish().unwrap();
        assert_eq!((f.width, f.height), (32, 32));
        assert!(px(&f, 31, 31)[0] < 255);
        assert_eq!(px(&f, 1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn clip_limits_fill() {
        let mut s = Surface::new(16, 16).unwrap();
        let clip = Rect::new(0.0, 0.0, 8.0, 16.0).to_path(0.1);
        s.with_clip(&clip, |s| {
            s.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0), Rgba8::WHITE);
        });
        let f = s.finish().unwrap();
        assert_eq!(px(&f, 3, 8), [255, 255, 255, 255]);
        assert_eq!(px(&f, 12, 8), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_scales_into_destination() {
        let img = DecodedImage {
            width: 2,
            height: 1,
            rgba8_premul: Arc::new(vec![255, 0, 0, 255, 255, 0, 0, 255]),
        };
        let mut s = Surface::new(20, 20).unwrap();
        s.draw_image(&img, Rect::new(0.0, 5.0, 20.0, 15.0)).unwrap();
        let f = s.finish().unwrap();
        assert_eq!(px(&f, 10, 10), [255, 0, 0, 255]);
        assert_eq!(px(&f, 10, 2)[3], 0);
    }
}
