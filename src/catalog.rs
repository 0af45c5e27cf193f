//! Static cover textures and base colors offered to the user.

use crate::foundation::{core::Rgba8, error::SashResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TextureOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Fragment inserted into the generation prompt.
    pub prompt_mod: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ColorOption {
    pub id: &'static str,
    pub name: &'static str,
    pub hex: &'static str,
}

impl ColorOption {
    pub fn rgba(&self) -> SashResult<Rgba8> {
        Rgba8::parse_hex(self.hex)
    }

    pub fn is_light(&self) -> bool {
        is_light_color(self.id)
    }
}

pub const TEXTURES: &[TextureOption] = &[
    TextureOption {
        id: "kids-fairy",
        name: "Fiaba Incantata",
        description: "Foresta magica, acquerello e colori pastello.",
        prompt_mod: "magical fairy tale forest pattern, soft watercolor illustration style, cute woodland animals, mushrooms, pastel pink and green colors, nursery decor",
    },
    TextureOption {
        id: "kids-space",
        name: "Esploratore Spaziale",
        description: "Razzi, pianeti e stelle su sfondo blu notte.",
        prompt_mod: "cute outer space cartoon pattern, rockets, planets and stars, deep blue background, vector art style for kids room",
    },
    TextureOption {
        id: "kids-doodle",
        name: "Piccoli Artisti",
        description: "Disegni a pastello colorati su sfondo bianco.",
        prompt_mod: "playful hand-drawn crayon doodle pattern on white paper texture, colorful scribbles, child drawing style, happy vibe",
    },
    TextureOption {
        id: "kids-dinos",
        name: "Dino Park",
        description: "Dinosauri simpatici e natura stilizzata.",
        prompt_mod: "cute dinosaur pattern, cartoon style, stylized plants, green and orange tones, fun wallpaper design",
    },
    TextureOption {
        id: "art-giotto",
        name: "Stile Giotto",
        description: "Affresco medievale, blu lapislazzuli e oro.",
        prompt_mod: "printed graphic design of a Giotto di Bondone fresco painting, deep lapis lazuli blue sky, gold halos, medieval italian art style, pictorial finish",
    },
    TextureOption {
        id: "art-majolica",
        name: "Maiolica Siciliana",
        description: "Ceramica decorata con motivi gialli e blu.",
        prompt_mod: "traditional sicilian majolica ceramic tile pattern, lemon yellow and cobalt blue geometric floral design",
    },
    TextureOption {
        id: "cover-matte-pvc",
        name: "Opaco Soft Touch",
        description: "Finitura moderna liscia e non riflettente.",
        prompt_mod: "smooth soft-touch matte PVC finish, solid color",
    },
    TextureOption {
        id: "cover-wood-texture",
        name: "Effetto Legno Scuro",
        description: "Texture realistica rovere scuro.",
        prompt_mod: "realistic dark oak wood grain texture",
    },
    TextureOption {
        id: "cover-light-wood",
        name: "Legno Chiaro",
        description: "Essenza naturale luminosa (Pino/Frassino).",
        prompt_mod: "realistic light pine or ash wood grain texture, bright natural finish",
    },
    TextureOption {
        id: "cover-brushed-metal",
        name: "Metallo Spazzolato",
        description: "Look metallico in alluminio o acciaio.",
        prompt_mod: "brushed aluminum metallic texture",
    },
    TextureOption {
        id: "cover-carbon",
        name: "Fibra di Carbonio",
        description: "Look tecnico e industriale.",
        prompt_mod: "carbon fiber pattern",
    },
];

pub const COLORS: &[ColorOption] = &[
    // Neutrals
    ColorOption { id: "pure-white", name: "Bianco Puro", hex: "#FFFFFF" },
    ColorOption { id: "cream", name: "Crema", hex: "#F5F5DC" },
    ColorOption { id: "pearl-grey", name: "Grigio Perla", hex: "#e5e7eb" },
    ColorOption { id: "anthracite", name: "Antracite", hex: "#383e42" },
    ColorOption { id: "jet-black", name: "Nero Assoluto", hex: "#1a1a1a" },
    // Classics
    ColorOption { id: "ruby-red", name: "Rosso Rubino", hex: "#9b111e" },
    ColorOption { id: "moss-green", name: "Verde Muschio", hex: "#2F4538" },
    ColorOption { id: "navy-blue", name: "Blu Notte", hex: "#191970" },
    ColorOption { id: "chocolate", name: "Cioccolato", hex: "#3e2723" },
    // Vivid / pastel
    ColorOption { id: "baby-blue", name: "Azzurro Cielo", hex: "#89CFF0" },
    ColorOption { id: "baby-pink", name: "Rosa Confetto", hex: "#FFB7C5" },
    ColorOption { id: "mint", name: "Verde Menta", hex: "#98FF98" },
    ColorOption { id: "lavender", name: "Lavanda", hex: "#E6E6FA" },
    ColorOption { id: "sun-yellow", name: "Giallo Sole", hex: "#FDB813" },
    ColorOption { id: "purple", name: "Viola", hex: "#800080" },
    // Wood / metals
    ColorOption { id: "golden-oak", name: "Rovere Dorato", hex: "#b58c56" },
    ColorOption { id: "walnut", name: "Noce Scuro", hex: "#5d4037" },
    ColorOption { id: "mahogany", name: "Mogano", hex: "#6d2a25" },
    ColorOption { id: "silver", name: "Argento", hex: "#C0C0C0" },
    ColorOption { id: "bronze", name: "Bronzo", hex: "#cd7f32" },
    ColorOption { id: "gold", name: "Oro", hex: "#D4AF37" },
];

/// Colors that need dark text drawn on top of them.
const LIGHT_COLORS: &[&str] = &[
    "pure-white",
    "cream",
    "silver",
    "mint",
    "baby-pink",
    "baby-blue",
    "pearl-grey",
    "lavender",
    "sun-yellow",
    "gold",
];

pub fn texture_by_id(id: &str) -> Option<&'static TextureOption> {
    TEXTURES.iter().find(|t| t.id == id)
}

pub fn color_by_id(id: &str) -> Option<&'static ColorOption> {
    COLORS.iter().find(|c| c.id == id)
}

pub fn is_light_color(id: &str) -> bool {
    LIGHT_COLORS.contains(&id)
}

/// Download name of a generated design.
pub fn design_file_name(color_id: &str, texture_id: &str) -> String {
    format!("magnetika-dgv-{color_id}-{texture_id}.png")
}

/// Download name of a presentation sheet.
pub fn sheet_file_name(texture_id: &str) -> String {
    format!("MAGNETIKA-Progetto-{texture_id}.jpg")
}
