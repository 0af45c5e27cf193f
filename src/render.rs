pub mod encode;
pub mod surface;
pub mod text;

pub use encode::{EncodedImage, ImageFormat, RasterImage};
pub use surface::{Shadow, Surface};
pub use text::{FontTextPainter, RecordingPainter, TextAlign, TextPainter, TextRun, TextStyle};

/// Rendered surface contents before encoding.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}
