// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the photo booth

use crate::constants::generation::REFUSAL_EXCERPT_CHARS;
use crate::fl;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Camera and still capture errors
    Capture(CaptureError),
    /// Filter bake errors
    Filter(FilterError),
    /// Remote generation errors
    Generation(GenerationError),
    /// Share and print errors
    Output(OutputError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Capture device errors
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Permission denied or no device matching the requested facing
    DeviceUnavailable(String),
    /// The torch constraint was rejected by the hardware
    TorchFailure(String),
    /// Torch control requested on a device without one
    TorchUnsupported,
    /// Capture requested while no stream is live
    NoStream,
    /// Uploaded bytes are not a decodable image
    InvalidImage(String),
    /// Encoding the still failed
    EncodingFailed(String),
}

/// Filter bake errors
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Source image could not be decoded
    Decode(String),
    /// Filtered image could not be encoded
    Encode(String),
}

/// Remote generation errors
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// No credential configured; the service was not contacted
    MissingCredential,
    /// The service answered with text instead of an image
    ModelRefused(String),
    /// The service answered with neither image nor text
    EmptyResponse,
    /// Network or HTTP level failure
    Transport(String),
    /// The service returned an image payload that could not be decoded
    InvalidPayload(String),
}

/// Output action errors
#[derive(Debug, Clone, PartialEq)]
pub enum OutputError {
    /// The platform has no share surface
    ShareUnsupported,
    /// The share surface rejected or cancelled the request
    ShareFailed(String),
    /// Output requested without a generated result
    NoResult,
    /// Writing the output document or file failed
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Filter(e) => write!(f, "Filter error: {}", e),
            AppError::Generation(e) => write!(f, "Generation error: {}", e),
            AppError::Output(e) => write!(f, "Output error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CaptureError::TorchFailure(msg) => write!(f, "Torch toggle failed: {}", msg),
            CaptureError::TorchUnsupported => write!(f, "Active camera has no torch"),
            CaptureError::NoStream => write!(f, "No camera stream is running"),
            CaptureError::InvalidImage(msg) => write!(f, "Not a supported image: {}", msg),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Decode(msg) => write!(f, "Failed to decode source image: {}", msg),
            FilterError::Encode(msg) => write!(f, "Failed to encode filtered image: {}", msg),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::MissingCredential => write!(f, "API credential is missing"),
            GenerationError::ModelRefused(text) => write!(f, "Model returned text: {}", text),
            GenerationError::EmptyResponse => write!(f, "Service returned no image data"),
            GenerationError::Transport(msg) => write!(f, "Request failed: {}", msg),
            GenerationError::InvalidPayload(msg) => write!(f, "Invalid image payload: {}", msg),
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::ShareUnsupported => write!(f, "Sharing is not supported here"),
            OutputError::ShareFailed(msg) => write!(f, "Share failed: {}", msg),
            OutputError::NoResult => write!(f, "No generated image available"),
            OutputError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for FilterError {}
impl std::error::Error for GenerationError {}
impl std::error::Error for OutputError {}

impl GenerationError {
    /// Localized message shown on the error screen
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::MissingCredential => fl!("error-missing-credential"),
            GenerationError::ModelRefused(text) => {
                let excerpt: String = text.chars().take(REFUSAL_EXCERPT_CHARS).collect();
                fl!("error-model-refused", excerpt = excerpt)
            }
            GenerationError::EmptyResponse => fl!("error-empty-response"),
            GenerationError::Transport(_) | GenerationError::InvalidPayload(_) => {
                fl!("error-generic")
            }
        }
    }
}

impl AppError {
    /// Localized message shown on the error screen
    pub fn user_message(&self) -> String {
        match self {
            AppError::Generation(e) => e.user_message(),
            AppError::Capture(CaptureError::DeviceUnavailable(_)) => fl!("camera-access-failed"),
            _ => fl!("error-generic"),
        }
    }
}

// Conversions from sub-errors to AppError
impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        AppError::Filter(err)
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err)
    }
}

impl From<OutputError> for AppError {
    fn from(err: OutputError) -> Self {
        AppError::Output(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for OutputError {
    fn from(err: std::io::Error) -> Self {
        OutputError::Io(err.to_string())
    }
}

impl From<image::ImageError> for FilterError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(_) => FilterError::Encode(err.to_string()),
            _ => FilterError::Decode(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_not_empty() {
        let errors = [
            GenerationError::MissingCredential,
            GenerationError::ModelRefused("no".to_string()),
            GenerationError::EmptyResponse,
            GenerationError::Transport("connection reset".to_string()),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty(), "{:?} has no message", err);
        }
    }

    #[test]
    fn test_refusal_excerpt_is_truncated() {
        let long = "x".repeat(500);
        let message = GenerationError::ModelRefused(long).user_message();
        assert!(message.contains(&"x".repeat(REFUSAL_EXCERPT_CHARS)));
        assert!(!message.contains(&"x".repeat(REFUSAL_EXCERPT_CHARS + 1)));
    }

    #[test]
    fn test_conversion_into_app_error() {
        let err: AppError = GenerationError::EmptyResponse.into();
        assert_eq!(err, AppError::Generation(GenerationError::EmptyResponse));
        assert!(err.to_string().contains("no image data"));
    }
}
