//! Sashcover renders the images behind a magnetic window-cover visualizer.
//!
//! # Pieces
//!
//! 1. **Sample window**: a procedural 1200x900 photo of a two-sash window, used
//!    when the user has no photo of their own ([`render_synthetic_window`]).
//! 2. **Generation**: a remote model restyles the sashes ([`DesignGenerator`],
//!    [`GeminiClient`]).
//! 3. **Presentation sheet**: before and after side by side on a 1920x1080
//!    branded sheet ([`Compositor`]).
//! 4. **Reveal**: the before/after slider flattened to one image
//!    ([`reveal_composite`]).
//!
//! Drawing happens on the CPU through `vello_cpu`. Buffers are premultiplied
//! RGBA8 until they are encoded.
#![forbid(unsafe_code)]

pub mod assets;
pub mod blur_cpu;
pub mod catalog;
pub mod composite_cpu;
pub mod foundation;
pub mod generate;
pub mod render;
pub mod reveal;
pub mod sheet;
pub mod window;

pub use assets::DecodedImage;
pub use assets::decode::decode_image;
pub use assets::source::{ImageSource, decode_pair, decode_source, http_client};
pub use catalog::{
    COLORS, ColorOption, TEXTURES, TextureOption, color_by_id, design_file_name, is_light_color,
    sheet_file_name, texture_by_id,
};
pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{SashError, SashResult};
pub use generate::{
    DesignGenerator, GeminiClient, GeminiConfig, GenerationRequest, build_prompt, parse_response,
};
pub use render::{
    EncodedImage, FontTextPainter, FrameRGBA, ImageFormat, RasterImage, RecordingPainter, Shadow,
    Surface, TextAlign, TextPainter, TextRun, TextStyle,
};
pub use reveal::reveal_composite;
pub use sheet::{Compositor, SheetLayout, SheetOpts, fit_image};
pub use window::{
    HandleSide, SashGeometry, WindowGeometry, render_synthetic_window, sample_data_uri,
};
