//! Remote image generation: the prompt, the request contract and a Gemini client.

use std::time::Duration;

use base64::Engine as _;

use crate::{
    catalog::{ColorOption, TextureOption},
    foundation::error::{SashError, SashResult},
    render::EncodedImage,
};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_ENVS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";

/// MIME type assumed for returned images that do not declare one.
const FALLBACK_OUTPUT_MIME: &str = "image/png";

/// One cover visualization request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Photo of the window to restyle.
    pub image: EncodedImage,
    /// Human-readable base tone, e.g. "Antracite".
    pub color_name: String,
    /// Surface design description, usually a texture's `prompt_mod`.
    pub texture_prompt: String,
}

impl GenerationRequest {
    pub fn new(
        image: EncodedImage,
        color_name: impl Into<String>,
        texture_prompt: impl Into<String>,
    ) -> Self {
        Self {
            image,
            color_name: color_name.into(),
            texture_prompt: texture_prompt.into(),
        }
    }

    pub fn from_catalog(image: EncodedImage, color: &ColorOption, texture: &TextureOption) -> Self {
        Self::new(image, color.name, texture.prompt_mod)
    }

    pub fn prompt(&self) -> String {
        build_prompt(&self.color_name, &self.texture_prompt)
    }
}

/// Produces a restyled window image.
#[allow(async_fn_in_trait)]
pub trait DesignGenerator {
    async fn generate(&self, req: &GenerationRequest) -> SashResult<EncodedImage>;
}

/// Instructions that restrict the cover to the moving sashes.
pub fn build_prompt(color_name: &str, texture_prompt: &str) -> String {
    format!(
        "You are a specialized visualization assistant for 'Magnetic Window Covers'.

Task:
1. Analyze the provided image of a window.
2. Identify the **moving sashes (ante)** and the **fixed outer frame (telaio)** attached to the wall.
3. Simulate applying a **custom magnetic cover** ONLY to the moving sashes (ante).
4. **DO NOT** apply the cover to the fixed outer frame (telaio). The outer frame must remain in its original color (usually white or neutral).

The cover design parameters are:
- **Base Tone/Color**: {color_name}
- **Surface Design/Texture**: {texture_prompt}

Instructions for \"Surface Design\":
- If the design is a material (like wood, PVC), make it look realistic.
- If the design is an **Artistic Pattern** (like Giotto, Fresco, Mosaic), apply it as a **high-quality graphic print** wrapped onto the sash profiles.

IMPORTANT CONSTRAINTS:
- **Apply cover ONLY to the sashes (ante)**.
- **Keep the fixed frame (telaio) ORIGINAL**.
- **Keep the glass transparent**. Do NOT cover the view through the window.
- **Keep the handle visible** (either metallic or color-matched, but distinct).
- Maintain original lighting and perspective.
- The result must look like a physical product applied specifically to the opening parts of the window.

Output: A high-resolution photorealistic image.
"
    )
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL up to and including the API version segment.
    pub endpoint: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Read the key from `GEMINI_API_KEY` (or `API_KEY`), plus optional model/endpoint overrides.
    pub fn from_env() -> SashResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> SashResult<Self> {
        let api_key = API_KEY_ENVS
            .iter()
            .find_map(|k| get(k).filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                SashError::validation(format!(
                    "no API key: set one of {}",
                    API_KEY_ENVS.join(", ")
                ))
            })?;
        let mut cfg = Self::new(api_key.trim());
        if let Some(model) = get(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.model = model;
        }
        if let Some(endpoint) = get(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.endpoint = endpoint;
        }
        Ok(cfg)
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> SashResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SashError::Other(anyhow::Error::new(e).context("build http client")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl DesignGenerator for GeminiClient {
    #[tracing::instrument(skip(self, req), fields(model = %self.config.model))]
    async fn generate(&self, req: &GenerationRequest) -> SashResult<EncodedImage> {
        let body = wire::GenerateRequest::new(&req.image, req.prompt());
        let url = self.config.generate_url();
        tracing::debug!(%url, image_len = req.image.bytes.len(), "requesting design");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SashError::generation(format!("request failed: {e}")))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SashError::generation(format!("reading response: {e}")))?;
        if !status.is_success() {
            return Err(SashError::generation(format!(
                "HTTP {status}: {}",
                truncate(&text, 300)
            )));
        }
        parse_response(&text)
    }
}

/// Extract the first inline image from a `generateContent` response body.
pub fn parse_response(body: &str) -> SashResult<EncodedImage> {
    let resp: wire::GenerateResponse = serde_json::from_str(body)
        .map_err(|e| SashError::generation(format!("malformed response: {e}")))?;
    let parts = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .ok_or_else(|| SashError::generation("no content generated"))?;

    let inline = parts
        .into_iter()
        .filter_map(|p| p.inline_data)
        .find(|d| !d.data.is_empty())
        .ok_or_else(|| SashError::generation("no image data found in response"))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(inline.data.trim())
        .map_err(|e| SashError::generation(format!("image payload is not base64: {e}")))?;
    let mime = inline
        .mime_type
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_OUTPUT_MIME.to_string());
    Ok(EncodedImage::new(mime, bytes))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

mod wire {
    use serde::{Deserialize, Serialize};

    use crate::render::EncodedImage;

    #[derive(Serialize)]
    pub struct GenerateRequest {
        pub contents: Vec<Content>,
    }

    impl GenerateRequest {
        pub fn new(image: &EncodedImage, prompt: String) -> Self {
            Self {
                contents: vec![Content {
                    parts: vec![
                        Part {
                            inline_data: Some(InlineData {
                                mime_type: Some(image.mime_type.clone()),
                                data: image.base64(),
                            }),
                            text: None,
                        },
                        Part {
                            inline_data: None,
                            text: Some(prompt),
                        },
                    ],
                }],
            }
        }
    }

    #[derive(Serialize, Deserialize, Default)]
    pub struct Content {
        #[serde(default)]
        pub parts: Vec<Part>,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct Part {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub inline_data: Option<InlineData>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub text: Option<String>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InlineData {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub mime_type: Option<String>,
        #[serde(default)]
        pub data: String,
    }

    #[derive(Deserialize)]
    pub struct GenerateResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
    }

    #[derive(Deserialize)]
    pub struct Candidate {
        pub content: Option<Content>,
    }
}
