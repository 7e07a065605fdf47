// SPDX-License-Identifier: GPL-3.0-only

//! Encoded image value shared by capture, filters, generation and output

use crate::constants::generation::FALLBACK_MIME;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::sync::Arc;

/// Image encoding detected from a byte signature or declared MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
    /// Recognised image type without a dedicated variant (MIME type kept verbatim)
    Other(String),
    /// Signature not recognised
    Unknown,
}

impl ImageEncoding {
    /// Detect the encoding from the leading bytes of an image
    pub fn sniff(bytes: &[u8]) -> Self {
        match image::guess_format(bytes) {
            Ok(format) => Self::from_image_format(format),
            Err(_) => ImageEncoding::Unknown,
        }
    }

    /// Map a declared MIME type (e.g. `image/png`)
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        match mime.as_str() {
            "image/jpeg" | "image/jpg" => ImageEncoding::Jpeg,
            "image/png" => ImageEncoding::Png,
            "image/webp" => ImageEncoding::Webp,
            "image/gif" => ImageEncoding::Gif,
            "image/bmp" => ImageEncoding::Bmp,
            other if other.starts_with("image/") => ImageEncoding::Other(other.to_string()),
            _ => ImageEncoding::Unknown,
        }
    }

    fn from_image_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => ImageEncoding::Jpeg,
            ImageFormat::Png => ImageEncoding::Png,
            ImageFormat::WebP => ImageEncoding::Webp,
            ImageFormat::Gif => ImageEncoding::Gif,
            ImageFormat::Bmp => ImageEncoding::Bmp,
            other => ImageEncoding::Other(other.to_mime_type().to_string()),
        }
    }

    /// MIME type sent to the generation service
    ///
    /// Unrecognised signatures are declared as JPEG.
    pub fn mime_type(&self) -> &str {
        match self {
            ImageEncoding::Jpeg => "image/jpeg",
            ImageEncoding::Png => "image/png",
            ImageEncoding::Webp => "image/webp",
            ImageEncoding::Gif => "image/gif",
            ImageEncoding::Bmp => "image/bmp",
            ImageEncoding::Other(mime) => mime.as_str(),
            ImageEncoding::Unknown => FALLBACK_MIME,
        }
    }

    /// File extension used when the image is written to disk
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Jpeg | ImageEncoding::Unknown => "jpg",
            ImageEncoding::Png => "png",
            ImageEncoding::Webp => "webp",
            ImageEncoding::Gif => "gif",
            ImageEncoding::Bmp => "bmp",
            ImageEncoding::Other(mime) => ImageFormat::from_mime_type(mime)
                .and_then(|f| f.extensions_str().first().copied())
                .unwrap_or("img"),
        }
    }
}

/// Encoded image bytes plus their encoding
///
/// Cloning is cheap: the bytes live behind an `Arc`, and a clone shares the
/// same buffer (see [`EncodedImage::shares_buffer`]).
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data: Arc<[u8]>,
    encoding: ImageEncoding,
}

impl EncodedImage {
    /// Wrap bytes with a known encoding
    pub fn new(data: impl Into<Arc<[u8]>>, encoding: ImageEncoding) -> Self {
        Self {
            data: data.into(),
            encoding,
        }
    }

    /// Wrap bytes, detecting the encoding from their signature
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        let data = data.into();
        let encoding = ImageEncoding::sniff(&data);
        Self { data, encoding }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn encoding(&self) -> &ImageEncoding {
        &self.encoding
    }

    pub fn mime_type(&self) -> &str {
        self.encoding.mime_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether both values point at the very same byte buffer
    pub fn shares_buffer(&self, other: &EncodedImage) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Decode into pixels
    pub fn decode(&self) -> image::ImageResult<DynamicImage> {
        image::load_from_memory(&self.data)
    }

    /// Base64 payload without any prefix
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }

    /// `data:` URL used to embed the image in documents
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.to_base64())
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("encoding", &self.encoding)
            .field("len", &self.data.len())
            .finish()
    }
}
