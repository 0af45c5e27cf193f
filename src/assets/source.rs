use std::{fmt, path::PathBuf, time::Duration};

use base64::Engine as _;

use crate::{
    SashError, SashResult,
    assets::{DecodedImage, decode::decode_image},
};

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client used for URL sources.
pub fn http_client() -> SashResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| SashError::Other(anyhow::Error::new(e).context("build http client")))
}

/// Where an input image comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
    /// `data:<mime>;base64,<payload>` URI.
    DataUri(String),
    /// `http://` or `https://` URL.
    Url(String),
    /// Local file path.
    Path(PathBuf),
}

impl ImageSource {
    /// Classify a user-supplied reference string.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        let lower = t.get(..8).unwrap_or(t).to_ascii_lowercase();
        if lower.starts_with("data:") {
            Self::DataUri(t.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(t.to_string())
        } else {
            Self::Path(PathBuf::from(t))
        }
    }

    /// Fetch the encoded bytes behind this source.
    pub async fn load_bytes(&self, http: &reqwest::Client) -> SashResult<Vec<u8>> {
        match self {
            Self::Bytes(b) => Ok(b.clone()),
            Self::DataUri(uri) => decode_data_uri(uri).map(|(_, bytes)| bytes),
            Self::Path(p) => tokio::fs::read(p)
                .await
                .map_err(|e| SashError::decode(format!("read '{}': {e}", p.display()))),
            Self::Url(url) => {
                let resp = http
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| SashError::decode(format!("fetch '{url}': {e}")))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(SashError::decode(format!("fetch '{url}': HTTP {status}")));
                }
                let body = resp
                    .bytes()
                    .await
                    .map_err(|e| SashError::decode(format!("read body of '{url}': {e}")))?;
                Ok(body.to_vec())
            }
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Self::DataUri(uri) => write!(f, "DataUri({} chars)", uri.len()),
            Self::Url(url) => write!(f, "Url({url})"),
            Self::Path(p) => write!(f, "Path({})", p.display()),
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Split a base64 `data:` URI into its MIME type and payload bytes.
pub fn decode_data_uri(uri: &str) -> SashResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| SashError::decode("data URI must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| SashError::decode("data URI is missing ','"))?;
    let mut parts = meta.split(';');
    let mime = parts.next().unwrap_or_default();
    if !parts.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(SashError::decode("only base64 data URIs are supported"));
    }
    let mime = if mime.is_empty() {
        "text/plain".to_string()
    } else {
        mime.to_ascii_lowercase()
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| SashError::decode(format!("data URI payload is not base64: {e}")))?;
    Ok((mime, bytes))
}

/// Load and decode one source. Decoding runs on the blocking pool.
#[tracing::instrument(skip(http))]
pub async fn decode_source(
    http: &reqwest::Client,
    source: &ImageSource,
) -> SashResult<DecodedImage> {
    let bytes = source.load_bytes(http).await?;
    let decoded = tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| SashError::decode(format!("decode task failed: {e}")))??;
    tracing::debug!(
        width = decoded.width,
        height = decoded.height,
        "decoded image source"
    );
    Ok(decoded)
}

/// Decode two sources concurrently.
///
/// The first failure wins and the other decode is dropped; nothing is returned partially.
pub async fn decode_pair(
    http: &reqwest::Client,
    a: &ImageSource,
    b: &ImageSource,
) -> SashResult<(DecodedImage, DecodedImage)> {
    let a = async {
        decode_source(http, a)
            .await
            .map_err(|e| label_decode_error("before", e))
    };
    let b = async {
        decode_source(http, b)
            .await
            .map_err(|e| label_decode_error("after", e))
    };
    futures::try_join!(a, b)
}

fn label_decode_error(which: &str, err: SashError) -> SashError {
    match err {
        SashError::Decode(msg) => SashError::decode(format!("{which} image: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classifies_references() {
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,AAAA"),
            ImageSource::DataUri(_)
        ));
        assert!(matches!(
            ImageSource::parse("https://example.com/w.jpg"),
            ImageSource::Url(_)
        ));
        assert!(matches!(
            ImageSource::parse("HTTP://example.com/w.jpg"),
            ImageSource::Url(_)
        ));
        assert!(matches!(
            ImageSource::parse("photos/window.jpg"),
            ImageSource::Path(_)
        ));
    }

    #[test]
    fn data_uri_round_trip() {
        let payload = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        let (mime, bytes) = decode_data_uri(&format!("data:image/PNG;base64,{payload}")).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn data_uri_without_base64_is_rejected() {
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("image/png;base64,AAAA").is_err());
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn debug_does_not_dump_payloads() {
        let s = format!("{:?}", ImageSource::Bytes(vec![0u8; 1024]));
        assert_eq!(s, "Bytes(1024 bytes)");
    }
}
