use std::{io::Cursor, path::Path, sync::Arc};

use base64::Engine as _;
use image::ImageEncoder as _;
use sha2::Digest as _;

use crate::{
    assets::source::decode_data_uri,
    composite_cpu,
    foundation::error::{SashError, SashResult},
    render::FrameRGBA,
};

/// Output codec of an [`EncodedImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG with quality in `1..=100`.
    Jpeg { quality: u8 },
    Png,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "jpg",
            Self::Png => "png",
        }
    }
}

/// Encoded bytes plus the MIME type they were declared with.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn from_data_uri(uri: &str) -> SashResult<Self> {
        let (mime_type, bytes) = decode_data_uri(uri)?;
        Ok(Self { mime_type, bytes })
    }

    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A finished artifact: the pixels that were drawn and their encoded form.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Straight-alpha RGBA8 exactly as drawn, before any lossy encoding.
    pub rgba8: Arc<Vec<u8>>,
    pub format: ImageFormat,
    pub encoded: EncodedImage,
}

impl RasterImage {
    pub fn encode(frame: FrameRGBA, format: ImageFormat) -> SashResult<Self> {
        let FrameRGBA {
            width,
            height,
            mut data,
            premultiplied,
        } = frame;
        if data.len() != width as usize * height as usize * 4 {
            return Err(SashError::encode("frame byte length mismatch"));
        }
        if premultiplied {
            composite_cpu::unpremultiply_in_place(&mut data);
        }

        let mut bytes = Vec::new();
        match format {
            ImageFormat::Jpeg { quality } => {
                if !(1..=100).contains(&quality) {
                    return Err(SashError::encode(format!(
                        "jpeg quality must be in 1..=100, got {quality}"
                    )));
                }
                let rgb: Vec<u8> = data
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality)
                    .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
                    .map_err(|e| SashError::encode(format!("jpeg: {e}")))?;
            }
            ImageFormat::Png => {
                image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes))
                    .write_image(&data, width, height, image::ExtendedColorType::Rgba8)
                    .map_err(|e| SashError::encode(format!("png: {e}")))?;
            }
        }

        tracing::debug!(width, height, len = bytes.len(), ?format, "encoded raster");
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(data),
            format,
            encoded: EncodedImage::new(format.mime_type(), bytes),
        })
    }

    /// SHA-256 of the drawn pixels, hex encoded. Independent of codec noise.
    pub fn pixel_digest(&self) -> String {
        sha256_hex(&self.rgba8)
    }

    pub fn to_data_uri(&self) -> String {
        self.encoded.to_data_uri()
    }

    pub fn save(&self, path: &Path) -> SashResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SashError::encode(format!("create output dir '{}': {e}", parent.display()))
            })?;
        }
        std::fs::write(path, &self.encoded.bytes)
            .map_err(|e| SashError::encode(format!("write '{}': {e}", path.display())))
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
        FrameRGBA {
            width: w,
            height: h,
            data: px.repeat((w * h) as usize),
            premultiplied: true,
        }
    }

    #[test]
    fn jpeg_encodes_and_decodes_to_same_size() {
        let img = RasterImage::encode(
            solid_frame(32, 24, [10, 20, 30, 255]),
            ImageFormat::Jpeg { quality: 90 },
        )
        .unwrap();
        assert_eq!(img.encoded.mime_type, "image/jpeg");
        let back = image::load_from_memory(&img.encoded.bytes).unwrap();
        assert_eq!((back.width(), back.height()), (32, 24));
    }

    #[test]
    fn jpeg_quality_out_of_range_is_encode_error() {
        let err = RasterImage::encode(solid_frame(2, 2, [0; 4]), ImageFormat::Jpeg { quality: 0 })
            .unwrap_err();
        assert!(matches!(err, SashError::Encode(_)));
    }

    #[test]
    fn data_uri_has_declared_mime() {
        let img = RasterImage::encode(solid_frame(2, 2, [0, 0, 0, 255]), ImageFormat::Png).unwrap();
        let uri = img.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(EncodedImage::from_data_uri(&uri).unwrap(), img.encoded);
    }

    #[test]
    fn pixel_digest_ignores_codec() {
        let a = RasterImage::encode(
            solid_frame(4, 4, [1, 2, 3, 255]),
            ImageFormat::Jpeg { quality: 50 },
        )
        .unwrap();
        let b = RasterImage::encode(solid_frame(4, 4, [1, 2, 3, 255]), ImageFormat::Png).unwrap();
        assert_eq!(a.pixel_digest(), b.pixel_digest());
        assert_eq!(a.pixel_digest().len(), 64);
    }
}
