use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    foundation::core::{Affine, Point, Rgba8},
    foundation::error::{SashError, SashResult},
    render::Surface,
};

/// Env var naming a font file to use instead of system fonts.
pub const FONT_OVERRIDE_ENV: &str = "SASHCOVER_FONT";

const PREFERRED_FAMILIES: &[&str] = &[
    "Inter",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextStyle {
    pub size_px: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgba8,
}

impl TextStyle {
    pub fn regular(size_px: f32, color: Rgba8) -> Self {
        Self {
            size_px,
            bold: false,
            italic: false,
            color,
        }
    }

    pub fn bold(size_px: f32, color: Rgba8) -> Self {
        Self {
            bold: true,
            ..Self::regular(size_px, color)
        }
    }

    pub fn italic(size_px: f32, color: Rgba8) -> Self {
        Self {
            italic: true,
            ..Self::regular(size_px, color)
        }
    }
}

/// One line of text anchored on its baseline, canvas `fillText` style.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextRun {
    pub text: String,
    pub anchor: Point,
    pub align: TextAlign,
    pub style: TextStyle,
}

/// Draws [`TextRun`]s onto a [`Surface`].
pub trait TextPainter {
    fn paint_text(&mut self, surface: &mut Surface, run: &TextRun) -> SashResult<()>;
}

/// Captures runs without drawing them.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub runs: Vec<TextRun>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().map(|r| r.text.as_str())
    }
}

impl TextPainter for RecordingPainter {
    fn paint_text(&mut self, _surface: &mut Surface, run: &TextRun) -> SashResult<()> {
        self.runs.push(run.clone());
        Ok(())
    }
}

impl<P: TextPainter + ?Sized> TextPainter for &mut P {
    fn paint_text(&mut self, surface: &mut Surface, run: &TextRun) -> SashResult<()> {
        (**self).paint_text(surface, run)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct FaceKey {
    bold: bool,
    italic: bool,
}

#[derive(Clone)]
struct LoadedFace {
    family: String,
    font: vello_cpu::peniko::FontData,
}

/// Shapes text with Parley using faces resolved from the system font database.
///
/// A missing face is not an error: the run is skipped with a warning so headless
/// machines without fonts still produce the rest of the artifact.
pub struct FontTextPainter {
    override_font: Option<PathBuf>,
    db: Option<usvg::fontdb::Database>,
    faces: HashMap<FaceKey, Option<LoadedFace>>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for FontTextPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl FontTextPainter {
    /// System fonts, or the file named by `SASHCOVER_FONT` when set.
    pub fn new() -> Self {
        let override_font = std::env::var_os(FONT_OVERRIDE_ENV)
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty());
        Self::with_font_override(override_font)
    }

    pub fn with_font_file(path: impl AsRef<Path>) -> Self {
        Self::with_font_override(Some(path.as_ref().to_path_buf()))
    }

    fn with_font_override(override_font: Option<PathBuf>) -> Self {
        Self {
            override_font,
            db: None,
            faces: HashMap::new(),
            font_ctx: registered_only_font_context(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn database(&mut self) -> &usvg::fontdb::Database {
        let override_font = self.override_font.clone();
        self.db.get_or_insert_with(|| {
            let mut db = usvg::fontdb::Database::new();
            match override_font {
                Some(path) => {
                    if let Err(e) = db.load_font_file(&path) {
                        tracing::warn!(path = %path.display(), error = %e, "failed to load font override");
                    }
                    let family = db
                        .faces()
                        .next()
                        .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
                    if let Some(name) = family {
                        db.set_sans_serif_family(name);
                    }
                }
                None => db.load_system_fonts(),
            }
            tracing::debug!(faces = db.len(), "font database loaded");
            db
        })
    }

    fn face_for(&mut self, key: FaceKey) -> Option<LoadedFace> {
        if let Some(cached) = self.faces.get(&key) {
            return cached.clone();
        }

        let loaded = self.resolve_face(key);
        if loaded.is_none() {
            tracing::warn!(?key, "no font face available, text will be skipped");
        }
        self.faces.insert(key, loaded.clone());
        loaded
    }

    fn resolve_face(&mut self, key: FaceKey) -> Option<LoadedFace> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let db = self.database();
        let mut families: Vec<Family<'_>> =
            PREFERRED_FAMILIES.iter().map(|n| Family::Name(*n)).collect();
        families.push(Family::SansSerif);
        let query = Query {
            families: &families,
            weight: if key.bold {
                Weight::BOLD
            } else {
                Weight::NORMAL
            },
            stretch: Stretch::Normal,
            style: if key.italic {
                Style::Italic
            } else {
                Style::Normal
            },
        };
        let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
        let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id)?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
        Some(LoadedFace { family, font })
    }

    fn layout(
        &mut self,
        run: &TextRun,
        family: &str,
    ) -> SashResult<parley::Layout<TextBrushRgba8>> {
        if !run.style.size_px.is_finite() || run.style.size_px <= 0.0 {
            return Err(SashError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let c = run.style.color;
        let brush = TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        };

        let mut builder =
            self.layout_ctx
                .ranged_builder(&mut self.font_ctx, run.text.as_str(), 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(run.style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if run.style.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        if run.style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(run.text.as_str());
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Parley context that sees only registered blobs, so shaped glyph ids always
/// index the face we draw with.
fn registered_only_font_context() -> parley::FontContext {
    parley::FontContext {
        collection: parley::fontique::Collection::new(parley::fontique::CollectionOptions {
            shared: false,
            system_fonts: false,
        }),
        source_cache: parley::fontique::SourceCache::default(),
    }
}

impl TextPainter for FontTextPainter {
    fn paint_text(&mut self, surface: &mut Surface, run: &TextRun) -> SashResult<()> {
        if run.text.is_empty() {
            return Ok(());
        }
        let key = FaceKey {
            bold: run.style.bold,
            italic: run.style.italic,
        };
        let Some(face) = self.face_for(key) else {
            return Ok(());
        };
        let layout = self.layout(run, &face.family)?;

        let width = f64::from(layout.width());
        let first_baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0);
        let x = match run.align {
            TextAlign::Left => run.anchor.x,
            TextAlign::Center => run.anchor.x - width / 2.0,
            TextAlign::Right => run.anchor.x - width,
        };
        let origin = Affine::translate((x, run.anchor.y - first_baseline));

        let ctx = surface.glyph_context(origin);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let brush = glyph_run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&face.font)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}
