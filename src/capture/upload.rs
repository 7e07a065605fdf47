// SPDX-License-Identifier: GPL-3.0-only

//! File upload path that bypasses the camera

use crate::errors::CaptureError;
use crate::media::EncodedImage;
use std::path::Path;
use tracing::info;

/// Accept raw bytes as the captured image
///
/// The bytes must decode as an image; they are kept as-is with the encoding
/// detected from their signature.
pub fn upload_from_bytes(bytes: impl Into<Vec<u8>>) -> Result<EncodedImage, CaptureError> {
    let image = EncodedImage::from_bytes(bytes.into());
    if image.is_empty() {
        return Err(CaptureError::InvalidImage("empty file".to_string()));
    }

    let decoded = image
        .decode()
        .map_err(|e| CaptureError::InvalidImage(e.to_string()))?;

    info!(
        encoding = ?image.encoding(),
        width = decoded.width(),
        height = decoded.height(),
        bytes = image.len(),
        "Image uploaded"
    );
    Ok(image)
}

/// Read an image file chosen by the user
pub fn upload_from_file(path: &Path) -> Result<EncodedImage, CaptureError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CaptureError::InvalidImage(format!("{}: {}", path.display(), e)))?;
    upload_from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageEncoding;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::new(3, 3))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_upload_keeps_original_bytes() {
        let bytes = png_bytes();
        let image = upload_from_bytes(bytes.clone()).unwrap();
        assert_eq!(image.bytes(), bytes.as_slice());
        assert_eq!(image.encoding(), &ImageEncoding::Png);
    }

    #[test]
    fn test_upload_rejects_non_images() {
        assert!(matches!(
            upload_from_bytes(b"%PDF-1.7".to_vec()),
            Err(CaptureError::InvalidImage(_))
        ));
        assert!(upload_from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_upload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guest.png");
        std::fs::write(&path, png_bytes()).unwrap();

        assert!(upload_from_file(&path).is_ok());
        assert!(upload_from_file(&dir.path().join("missing.png")).is_err());
    }
}
