// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the device the camera looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Front camera, pointed at the person holding the device
    #[default]
    User,
    /// Rear camera
    Environment,
}

impl Facing {
    pub fn opposite(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }

    /// Whether stills from this camera are mirrored to match the on-screen preview
    pub fn is_mirrored(self) -> bool {
        matches!(self, Facing::User)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::User => write!(f, "user"),
            Facing::Environment => write!(f, "environment"),
        }
    }
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(Facing::User),
            "environment" | "back" | "rear" => Ok(Facing::Environment),
            other => Err(format!("unknown camera facing '{}'", other)),
        }
    }
}

/// A capture device found during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Card name reported by the driver
    pub name: String,
    /// Device node, e.g. `/dev/video0`
    pub path: String,
    /// Driver name
    pub driver: String,
    /// Location hint derived from the card name ("front" / "back")
    pub camera_location: Option<String>,
}

impl CameraDevice {
    /// Infer a facing hint from a card name
    pub fn location_from_name(name: &str) -> Option<String> {
        let lower = name.to_ascii_lowercase();
        if ["front", "user", "selfie"].iter().any(|k| lower.contains(k)) {
            Some("front".to_string())
        } else if ["back", "rear", "environment", "world"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some("back".to_string())
        } else {
            None
        }
    }

    pub fn facing_hint(&self) -> Option<Facing> {
        match self.camera_location.as_deref() {
            Some("front") => Some(Facing::User),
            Some("back") => Some(Facing::Environment),
            _ => None,
        }
    }
}

/// Negotiated stream parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Device node the stream was opened on
    pub device: String,
    /// Frame width delivered by [`super::CameraBackend::grab_frame`]
    pub width: u32,
    /// Frame height delivered by [`super::CameraBackend::grab_frame`]
    pub height: u32,
    /// Pixel format negotiated with the driver (e.g. `MJPG`)
    pub pixel_format: String,
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Device refused to open (permissions, busy)
    InitializationFailed(String),
    /// Format not supported
    FormatNotSupported(String),
    /// Operation requires an open stream
    NotStreaming,
    /// General I/O error
    IoError(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::NotStreaming => write!(f, "Camera is not streaming"),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_parse_and_opposite() {
        assert_eq!("front".parse::<Facing>(), Ok(Facing::User));
        assert_eq!("Environment".parse::<Facing>(), Ok(Facing::Environment));
        assert!("sideways".parse::<Facing>().is_err());
        assert_eq!(Facing::User.opposite(), Facing::Environment);
        assert!(Facing::User.is_mirrored());
        assert!(!Facing::Environment.is_mirrored());
    }

    #[test]
    fn test_location_from_name() {
        assert_eq!(
            CameraDevice::location_from_name("Front Camera: ov5640"),
            Some("front".to_string())
        );
        assert_eq!(
            CameraDevice::location_from_name("imx258 rear"),
            Some("back".to_string())
        );
        assert_eq!(CameraDevice::location_from_name("HD Webcam C270"), None);
    }
}
