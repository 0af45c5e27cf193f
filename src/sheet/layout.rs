use crate::foundation::core::{Canvas, Point, Rect};

pub const SHEET_CANVAS: Canvas = Canvas::new(1920, 1080);
pub const HEADER_HEIGHT: f64 = 140.0;
/// Vertical space kept free for the footer when sizing the panels.
pub const FOOTER_RESERVE: f64 = 200.0;
pub const FOOTER_HEIGHT: f64 = 180.0;
pub const MARGIN: f64 = 60.0;
pub const CAPTION_GAP: f64 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SheetLayout {
    pub canvas: Canvas,
    pub header: Rect,
    /// Before panel, then after panel.
    pub panels: [Rect; 2],
    pub footer: Rect,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl SheetLayout {
    pub fn standard() -> Self {
        let canvas = SHEET_CANVAS;
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);

        let panel_w = (w - MARGIN * 3.0) / 2.0;
        let panel_h = h - HEADER_HEIGHT - FOOTER_RESERVE - MARGIN * 2.0;
        let panel_y = HEADER_HEIGHT + MARGIN;
        let left = Rect::from_origin_size((MARGIN, panel_y), (panel_w, panel_h));
        let right = Rect::from_origin_size((MARGIN * 2.0 + panel_w, panel_y), (panel_w, panel_h));

        Self {
            canvas,
            header: Rect::new(0.0, 0.0, w, HEADER_HEIGHT),
            panels: [left, right],
            footer: Rect::new(0.0, h - FOOTER_HEIGHT, w, h),
        }
    }

    pub fn panel_width(&self) -> f64 {
        self.panels[0].width()
    }

    pub fn panel_height(&self) -> f64 {
        self.panels[0].height()
    }

    /// Baseline anchor for the caption centered above panel `idx`.
    pub fn caption_anchor(&self, idx: usize) -> Point {
        let p = self.panels[idx.min(1)];
        Point::new(p.center().x, p.y0 - CAPTION_GAP)
    }
}

/// Largest rect with the image's aspect ratio that fits `panel`, centered in it.
pub fn fit_image(img_w: u32, img_h: u32, panel: Rect) -> Rect {
    if img_w == 0 || img_h == 0 {
        return Rect::from_center_size(panel.center(), (0.0, 0.0));
    }
    let (iw, ih) = (f64::from(img_w), f64::from(img_h));
    let scale = (panel.width() / iw).min(panel.height() / ih);
    Rect::from_center_size(panel.center(), (iw * scale, ih * scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_plus_margins_span_canvas() {
        let l = SheetLayout::standard();
        assert_eq!(l.panel_width(), 870.0);
        assert_eq!(l.panel_height(), 620.0);
        assert_eq!(l.panels[0].width(), l.panels[1].width());
        assert_eq!(
            l.panel_width() * 2.0 + MARGIN * 3.0,
            f64::from(l.canvas.width)
        );
        assert_eq!(l.panels[0].origin(), Point::new(60.0, 200.0));
        assert_eq!(l.panels[1].origin(), Point::new(990.0, 200.0));
    }

    #[test]
    fn footer_band_is_180_tall_at_bottom() {
        let l = SheetLayout::standard();
        assert_eq!(l.footer.y0, 900.0);
        assert_eq!(l.footer.height(), FOOTER_HEIGHT);
    }

    #[test]
    fn wide_image_is_width_limited_and_centered() {
        let panel = SheetLayout::standard().panels[1];
        let r = fit_image(2000, 500, panel);
        assert!((r.width() - 870.0).abs() < 1e-9);
        assert!((r.height() - 217.5).abs() < 1e-9);
        assert!((r.center().y - panel.center().y).abs() < 1e-9);
        assert!((r.width() / r.height() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn square_image_is_height_limited() {
        let panel = SheetLayout::standard().panels[0];
        let r = fit_image(1000, 1000, panel);
        assert_eq!(r.height(), 620.0);
        assert_eq!(r.width(), 620.0);
        assert_eq!(r.x0, 60.0 + (870.0 - 620.0) / 2.0);
    }

    #[test]
    fn caption_sits_above_panel_center() {
        let l = SheetLayout::standard();
        assert_eq!(l.caption_anchor(0), Point::new(495.0, 180.0));
        assert_eq!(l.caption_anchor(1), Point::new(1425.0, 180.0));
    }
}
