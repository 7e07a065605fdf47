// SPDX-License-Identifier: GPL-3.0-only

//! JSON bodies of the `generateContent` call and response parsing

use crate::constants::generation::REFUSAL_EXCERPT_CHARS;
use crate::errors::GenerationError;
use crate::media::{EncodedImage, ImageEncoding};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// One user turn: the photo followed by the instruction
    pub fn image_edit(mime_type: &str, base64_data: String, prompt: String) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64_data,
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

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, alias = "inline_data", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Response carrying a single part, mostly for fakes
    pub fn with_part(part: Part) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![part],
                }),
            }],
        }
    }

    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }
}

/// Extract the generated image from the first candidate
///
/// The first inline-data part wins. Without one, the first text part is
/// treated as a refusal. Anything else is an empty response.
pub fn parse_response(response: &GenerateContentResponse) -> Result<EncodedImage, GenerationError> {
    let parts = response.first_parts();

    if let Some(inline) = parts.iter().find_map(|p| p.inline_data.as_ref()) {
        let bytes = BASE64
            .decode(inline.data.trim())
            .map_err(|e| GenerationError::InvalidPayload(e.to_string()))?;
        if bytes.is_empty() {
            return Err(GenerationError::InvalidPayload("empty image data".to_string()));
        }

        let encoding = match ImageEncoding::from_mime(&inline.mime_type) {
            ImageEncoding::Unknown => ImageEncoding::sniff(&bytes),
            declared => declared,
        };
        return Ok(EncodedImage::new(bytes, encoding));
    }

    if let Some(text) = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .find(|t| !t.is_empty())
    {
        warn!(text, "Model returned text instead of an image");
        let excerpt: String = text.chars().take(REFUSAL_EXCERPT_CHARS).collect();
        return Err(GenerationError::ModelRefused(excerpt));
    }

    Err(GenerationError::EmptyResponse)
}
