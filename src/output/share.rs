// SPDX-License-Identifier: GPL-3.0-only

//! Sharing the generated image

use crate::constants::output::SHARE_FILE_NAME;
use crate::errors::OutputError;
use crate::fl;
use crate::media::EncodedImage;
use crate::storage;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a share surface is asked to send
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub file_name: String,
    pub image: EncodedImage,
}

impl ShareRequest {
    /// Localized request for a result image
    pub fn for_result(image: &EncodedImage) -> Self {
        let file_name = Path::new(SHARE_FILE_NAME)
            .with_extension(image.encoding().extension())
            .to_string_lossy()
            .to_string();

        Self {
            title: fl!("share-title"),
            text: fl!("share-text"),
            file_name,
            image: image.clone(),
        }
    }
}

/// Platform share sheet
pub trait ShareSurface: Send + Sync {
    /// Hand the request to the platform
    ///
    /// Returns [`OutputError::ShareUnsupported`] when there is no share
    /// facility and [`OutputError::ShareFailed`] when the user cancels or the
    /// target rejects the file.
    fn share(&self, request: &ShareRequest) -> Result<(), OutputError>;
}

/// Desktop sessions have no share sheet
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopShare;

impl ShareSurface for DesktopShare {
    fn share(&self, _request: &ShareRequest) -> Result<(), OutputError> {
        Err(OutputError::ShareUnsupported)
    }
}

/// How a share attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum ShareOutcome {
    /// The surface accepted the image
    Shared,
    /// No share facility: the image was saved and the user gets a hint
    Saved { path: PathBuf, hint: String },
    /// The user cancelled or the target failed; nothing else happens
    Cancelled(String),
}

/// Share `result`, falling back to saving it in `fallback_dir`
pub async fn share(
    surface: &dyn ShareSurface,
    result: Option<&EncodedImage>,
    fallback_dir: &Path,
) -> Result<ShareOutcome, OutputError> {
    let image = result.ok_or(OutputError::NoResult)?;
    let request = ShareRequest::for_result(image);

    match surface.share(&request) {
        Ok(()) => {
            info!(file = %request.file_name, "Image shared");
            Ok(ShareOutcome::Shared)
        }
        Err(OutputError::ShareUnsupported) => {
            let path = storage::save_result(image, fallback_dir).await?;
            info!(path = %path.display(), "Share unsupported, image saved instead");
            Ok(ShareOutcome::Saved {
                path,
                hint: fl!("share-unsupported"),
            })
        }
        Err(OutputError::ShareFailed(reason)) => {
            info!(reason = %reason, "Share cancelled or failed");
            Ok(ShareOutcome::Cancelled(reason))
        }
        Err(e) => {
            warn!(error = %e, "Share surface error");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingShare {
        result: Result<(), OutputError>,
        seen: Mutex<Vec<ShareRequest>>,
    }

    impl ShareSurface for RecordingShare {
        fn share(&self, request: &ShareRequest) -> Result<(), OutputError> {
            self.seen.lock().unwrap().push(request.clone());
            self.result.clone()
        }
    }

    fn jpeg() -> EncodedImage {
        EncodedImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00])
    }

    #[tokio::test]
    async fn test_share_sends_named_file() {
        let surface = RecordingShare {
            result: Ok(()),
            seen: Mutex::new(Vec::new()),
        };
        let dir = tempfile::tempdir().unwrap();
        let outcome = share(&surface, Some(&jpeg()), dir.path()).await.unwrap();

        assert_eq!(outcome, ShareOutcome::Shared);
        let seen = surface.seen.lock().unwrap();
        assert_eq!(seen[0].file_name, SHARE_FILE_NAME);
        assert!(!seen[0].title.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_saves_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = share(&DesktopShare, Some(&jpeg()), dir.path()).await.unwrap();

        match outcome {
            ShareOutcome::Saved { path, hint } => {
                assert!(path.exists());
                assert!(!hint.is_empty());
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_is_not_an_error() {
        let surface = RecordingShare {
            result: Err(OutputError::ShareFailed("dismissed".into())),
            seen: Mutex::new(Vec::new()),
        };
        let dir = tempfile::tempdir().unwrap();
        let outcome = share(&surface, Some(&jpeg()), dir.path()).await.unwrap();
        assert_eq!(outcome, ShareOutcome::Cancelled("dismissed".into()));
    }

    #[tokio::test]
    async fn test_share_without_result() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            share(&DesktopShare, None, dir.path()).await,
            Err(OutputError::NoResult)
        );
    }
}
