use kurbo::Shape as _;

use crate::{
    assets::{
        DecodedImage,
        source::{ImageSource, decode_pair, http_client},
    },
    foundation::core::{Point, Rect, Rgba8, Vec2},
    foundation::error::{SashError, SashResult},
    render::{
        FontTextPainter, ImageFormat, RasterImage, Shadow, Surface, TextAlign, TextPainter,
        TextRun, TextStyle,
    },
    sheet::layout::{MARGIN, SheetLayout, fit_image},
};

const BACKGROUND: Rgba8 = Rgba8::hex(0xf8fafc);
const HEADER: Rgba8 = Rgba8::hex(0x1e293b);
const SUBTITLE: Rgba8 = Rgba8::hex(0x94a3b8);
const PANEL_BORDER: Rgba8 = Rgba8::hex(0xe2e8f0);
const CAPTION: Rgba8 = Rgba8::hex(0x1e293b);
const TEXTURE_LABEL: Rgba8 = Rgba8::hex(0x0f172a);
const COLOR_LINE: Rgba8 = Rgba8::hex(0x64748b);
const PROVENANCE: Rgba8 = Rgba8::hex(0x94a3b8);

const PANEL_BORDER_WIDTH: f64 = 4.0;
const SUBTITLE_X: f64 = 500.0;
const HEADER_BASELINE: f64 = 90.0;
const PATH_TOLERANCE: f64 = 0.1;

/// Texts and encoding settings of a sheet. Every field has a default, so a
/// partial JSON object is enough to override one label.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetOpts {
    pub title: String,
    pub subtitle: String,
    pub before_caption: String,
    pub after_caption: String,
    /// Prepended to the color label in the footer.
    pub color_prefix: String,
    pub provenance: String,
    pub jpeg_quality: u8,
}

impl Default for SheetOpts {
    fn default() -> Self {
        Self {
            title: "MAGNETIKA DGV".to_string(),
            subtitle: "Simulazione Cover Magnetica".to_string(),
            before_caption: "Stato Attuale".to_string(),
            after_caption: "Con Cover Magnetika".to_string(),
            color_prefix: "Finitura Base: ".to_string(),
            provenance: "Design generato con MAGNETIKA DGV App".to_string(),
            jpeg_quality: 90,
        }
    }
}

impl SheetOpts {
    pub fn from_json(json: &str) -> SashResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| SashError::validation(format!("sheet options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> SashResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(SashError::validation(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Builds the 1920x1080 comparison sheet.
pub struct Compositor<P: TextPainter = FontTextPainter> {
    opts: SheetOpts,
    layout: SheetLayout,
    http: reqwest::Client,
    painter: P,
}

impl Compositor<FontTextPainter> {
    pub fn new() -> SashResult<Self> {
        Self::with_painter(FontTextPainter::new())
    }
}

impl<P: TextPainter> Compositor<P> {
    pub fn with_painter(painter: P) -> SashResult<Self> {
        Ok(Self {
            opts: SheetOpts::default(),
            layout: SheetLayout::standard(),
            http: http_client()?,
            painter,
        })
    }

    pub fn with_opts(mut self, opts: SheetOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn opts(&self) -> &SheetOpts {
        &self.opts
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    pub fn into_painter(self) -> P {
        self.painter
    }

    /// Decode both inputs, then draw and encode the sheet.
    ///
    /// Nothing is drawn unless both decodes succeed.
    #[tracing::instrument(skip(self, before, after))]
    pub async fn compose_sheet(
        &mut self,
        before: &ImageSource,
        after: &ImageSource,
        texture_label: &str,
        color_label: &str,
    ) -> SashResult<RasterImage> {
        let (before, after) = decode_pair(&self.http, before, after).await?;
        self.draw_sheet(&before, &after, texture_label, color_label)
    }

    pub fn draw_sheet(
        &mut self,
        before: &DecodedImage,
        after: &DecodedImage,
        texture_label: &str,
        color_label: &str,
    ) -> SashResult<RasterImage> {
        self.opts.validate()?;
        let l = &self.layout;
        let mut s = Surface::new(l.canvas.width, l.canvas.height)?;

        s.fill_rect(l.canvas.rect(), BACKGROUND);
        s.fill_rect(l.header, HEADER);
        self.painter.paint_text(
            &mut s,
            &run(
                &self.opts.title,
                Point::new(MARGIN, HEADER_BASELINE),
                TextAlign::Left,
                TextStyle::bold(50.0, Rgba8::WHITE),
            ),
        )?;
        self.painter.paint_text(
            &mut s,
            &run(
                &self.opts.subtitle,
                Point::new(SUBTITLE_X, HEADER_BASELINE),
                TextAlign::Left,
                TextStyle::regular(30.0, SUBTITLE),
            ),
        )?;

        for (image, panel) in [before, after].into_iter().zip(l.panels) {
            draw_panel_image(&mut s, image, panel)?;
        }

        for (idx, caption) in [&self.opts.before_caption, &self.opts.after_caption]
            .into_iter()
            .enumerate()
        {
            self.painter.paint_text(
                &mut s,
                &run(
                    caption,
                    l.caption_anchor(idx),
                    TextAlign::Center,
                    TextStyle::bold(28.0, CAPTION),
                ),
            )?;
        }

        let footer = l.footer;
        s.drop_shadow(
            &footer.to_path(PATH_TOLERANCE),
            Shadow {
                color: Rgba8::black_alpha(0.05),
                blur: 20.0,
                offset: Vec2::new(0.0, -5.0),
            },
        )?;
        s.fill_rect(footer, Rgba8::WHITE);

        self.painter.paint_text(
            &mut s,
            &run(
                texture_label,
                Point::new(MARGIN, footer.y0 + 80.0),
                TextAlign::Left,
                TextStyle::bold(40.0, TEXTURE_LABEL),
            ),
        )?;
        self.painter.paint_text(
            &mut s,
            &run(
                &format!("{}{}", self.opts.color_prefix, color_label),
                Point::new(MARGIN, footer.y0 + 130.0),
                TextAlign::Left,
                TextStyle::regular(30.0, COLOR_LINE),
            ),
        )?;
        self.painter.paint_text(
            &mut s,
            &run(
                &self.opts.provenance,
                Point::new(footer.x1 - MARGIN, footer.y0 + 100.0),
                TextAlign::Right,
                TextStyle::italic(24.0, PROVENANCE),
            ),
        )?;

        RasterImage::encode(
            s.finish()?,
            ImageFormat::Jpeg {
                quality: self.opts.jpeg_quality,
            },
        )
    }
}

fn draw_panel_image(s: &mut Surface, image: &DecodedImage, panel: Rect) -> SashResult<()> {
    let dest = fit_image(image.width, image.height, panel);
    tracing::debug!(?panel, ?dest, "placing panel image");
    s.drop_shadow(
        &dest.to_path(PATH_TOLERANCE),
        Shadow {
            color: Rgba8::black_alpha(0.15),
            blur: 20.0,
            offset: Vec2::new(0.0, 10.0),
        },
    )?;
    s.draw_image(image, dest)?;
    s.stroke_rect(dest, PANEL_BORDER, PANEL_BORDER_WIDTH);
    Ok(())
}

fn run(text: &str, anchor: Point, align: TextAlign, style: TextStyle) -> TextRun {
    TextRun {
        text: text.to_string(),
        anchor,
        align,
        style,
    }
}
