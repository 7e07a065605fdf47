// SPDX-License-Identifier: GPL-3.0-only

//! Saving booth images to disk

use crate::constants::output::RESULT_FILE_PREFIX;
use crate::errors::OutputError;
use crate::media::EncodedImage;
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamped file name for a result, e.g. `national_day_20251218_101500.png`
pub fn result_file_name(image: &EncodedImage) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!(
        "{}_{}.{}",
        RESULT_FILE_PREFIX,
        timestamp,
        image.encoding().extension()
    )
}

/// Write `image` into `dir` under `file_name`, creating the directory
pub async fn save_as(
    image: &EncodedImage,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, OutputError> {
    let path = dir.join(file_name);
    let dir = dir.to_path_buf();
    let target = path.clone();
    let image = image.clone();

    // Disk I/O off the async threads
    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&target, image.bytes())
    })
    .await
    .map_err(|e| OutputError::Io(format!("save task failed: {}", e)))??;

    info!(path = %path.display(), "Image saved");
    Ok(path)
}

/// Save a result with a timestamped name
pub async fn save_result(image: &EncodedImage, dir: &Path) -> Result<PathBuf, OutputError> {
    save_as(image, dir, &result_file_name(image)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_result_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("booth").join("results");
        let image = EncodedImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]);

        let path = save_result(&image, &nested).await.unwrap();
        assert!(path.starts_with(&nested));
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(std::fs::read(&path).unwrap(), image.bytes());
    }

    #[test]
    fn test_result_file_name_prefix() {
        let image = EncodedImage::from_bytes(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        let name = result_file_name(&image);
        assert!(name.starts_with("national_day_"));
        assert!(name.ends_with(".png"));
    }
}
