use crate::foundation::core::{BezPath, Canvas, Point, Rect};

pub const CANVAS: Canvas = Canvas::new(1200, 900);
pub const WINDOW_WIDTH: f64 = 500.0;
pub const WINDOW_HEIGHT: f64 = 550.0;
pub const FRAME_WIDTH: f64 = 40.0;
pub const SASH_GAP: f64 = 4.0;
/// Width of the sash profile around the glass; also the miter seam length.
pub const SASH_FRAME_SIZE: f64 = 45.0;
pub const SASH_INSET_X: f64 = 2.0;
pub const SASH_INSET_Y: f64 = 3.0;
pub const HANDLE_OFFSET: f64 = 25.0;
pub const HANDLE_BASE_WIDTH: f64 = 16.0;
pub const HANDLE_BASE_HEIGHT: f64 = 60.0;
pub const GRIP_DROP: f64 = 20.0;
pub const GRIP_REACH: f64 = 50.0;
pub const GRIP_WIDTH: f64 = 12.0;
pub const GRIP_HIGHLIGHT_WIDTH: f64 = 4.0;
pub const SILL_OVERHANG: f64 = 10.0;
pub const SILL_HEIGHT: f64 = 25.0;
pub const SILL_HIGHLIGHT_HEIGHT: f64 = 5.0;

/// Which sash a handle belongs to. Right is the mirror image of left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleSide {
    Left,
    Right,
}

impl HandleSide {
    /// Horizontal direction the grip points in.
    pub fn direction(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SashGeometry {
    pub side: HandleSide,
    pub rect: Rect,
    pub glass: Rect,
    /// Center of the handle base plate.
    pub handle: Point,
}

impl SashGeometry {
    fn new(side: HandleSide, origin: Point, width: f64, height: f64) -> Self {
        let rect = Rect::from_origin_size(origin, (width, height));
        let glass = rect.inset(-SASH_FRAME_SIZE);
        let handle_x = match side {
            HandleSide::Left => rect.x1 - HANDLE_OFFSET,
            HandleSide::Right => rect.x0 + HANDLE_OFFSET,
        };
        Self {
            side,
            rect,
            glass,
            handle: Point::new(handle_x, rect.y0 + height / 2.0),
        }
    }

    /// Decorative corner seams, each running from a sash corner toward the glass corner.
    pub fn miter_lines(&self) -> [(Point, Point); 4] {
        let r = self.rect;
        let d = SASH_FRAME_SIZE;
        [
            (Point::new(r.x0, r.y0), Point::new(r.x0 + d, r.y0 + d)),
            (Point::new(r.x1, r.y0), Point::new(r.x1 - d, r.y0 + d)),
            (Point::new(r.x0, r.y1), Point::new(r.x0 + d, r.y1 - d)),
            (Point::new(r.x1, r.y1), Point::new(r.x1 - d, r.y1 - d)),
        ]
    }

    pub fn miter_path(&self) -> BezPath {
        let mut p = BezPath::new();
        for (a, b) in self.miter_lines() {
            p.move_to(a);
            p.line_to(b);
        }
        p
    }

    /// Translucent highlight quad; extends past the glass and is meant to be clipped to it.
    pub fn reflection(&self) -> BezPath {
        let g = self.glass;
        let mut p = BezPath::new();
        p.move_to((g.x0 - 20.0, g.y1));
        p.line_to((g.x1 + 20.0, g.y0 - 20.0));
        p.line_to((g.x1 + 100.0, g.y0 - 20.0));
        p.line_to((g.x0 + 60.0, g.y1));
        p.close_path();
        p
    }

    pub fn handle_base(&self) -> Rect {
        Rect::from_center_size(self.handle, (HANDLE_BASE_WIDTH, HANDLE_BASE_HEIGHT))
    }

    /// L-shaped grip centerline: down 20, then across 50.
    pub fn grip_path(&self) -> BezPath {
        self.grip_polyline(GRIP_DROP / 2.0, GRIP_REACH)
    }

    /// Specular sheen, sitting 2px above the grip's bottom edge and 2px shorter.
    pub fn grip_highlight_path(&self) -> BezPath {
        self.grip_polyline(GRIP_DROP / 2.0 - 2.0, GRIP_REACH - 2.0)
    }

    fn grip_polyline(&self, drop: f64, reach: f64) -> BezPath {
        let h = self.handle;
        let top = h.y - GRIP_DROP / 2.0;
        let mut p = BezPath::new();
        p.move_to((h.x, top));
        p.line_to((h.x, h.y + drop));
        p.line_to((h.x + self.side.direction() * reach, h.y + drop));
        p
    }
}

/// Every rectangle of the sample window, derived from the fixed constants.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowGeometry {
    pub canvas: Canvas,
    pub outer: Rect,
    pub inner: Rect,
    pub sash_width: f64,
    pub sash_height: f64,
    pub sashes: [SashGeometry; 2],
    pub sill: Rect,
    pub sill_highlight: Rect,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

impl WindowGeometry {
    pub fn standard() -> Self {
        let canvas = CANVAS;
        let center = canvas.rect().center();
        let outer = Rect::from_center_size(center, (WINDOW_WIDTH, WINDOW_HEIGHT));
        let inner = outer.inset(-FRAME_WIDTH);

        let sash_width = (inner.width() - SASH_GAP) / 2.0;
        let sash_height = inner.height() - 2.0 * SASH_INSET_Y;
        let y = inner.y0 + SASH_INSET_Y;
        let left = SashGeometry::new(
            HandleSide::Left,
            Point::new(inner.x0 + SASH_INSET_X, y),
            sash_width,
            sash_height,
        );
        let right = SashGeometry::new(
            HandleSide::Right,
            Point::new(inner.x0 + sash_width + SASH_GAP - SASH_INSET_X, y),
            sash_width,
            sash_height,
        );

        let sill = Rect::new(
            outer.x0 - SILL_OVERHANG,
            outer.y1,
            outer.x1 + SILL_OVERHANG,
            outer.y1 + SILL_HEIGHT,
        );
        let sill_highlight = Rect::new(sill.x0, sill.y0, sill.x1, sill.y0 + SILL_HIGHLIGHT_HEIGHT);

        Self {
            canvas,
            outer,
            inner,
            sash_width,
            sash_height,
            sashes: [left, right],
            sill,
            sill_highlight,
        }
    }
}
