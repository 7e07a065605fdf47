// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Digital zoom constants
pub mod zoom {
    /// Minimum zoom factor (no crop)
    pub const MIN: f32 = 1.0;

    /// Maximum zoom factor (a third of the frame in each dimension)
    pub const MAX: f32 = 3.0;

    /// Clamp a requested zoom into the supported range.
    ///
    /// NaN maps to [`MIN`] so a bad gesture sample can never poison the crop.
    pub fn clamp(value: f32) -> f32 {
        if value.is_nan() {
            MIN
        } else {
            value.clamp(MIN, MAX)
        }
    }
}

/// Encoding quality constants
pub mod quality {
    /// JPEG quality for stills captured from the camera
    pub const CAPTURE_JPEG: u8 = 90;

    /// JPEG quality for images with a baked filter
    pub const BAKE_JPEG: u8 = 95;
}

/// Camera stream constants
pub mod camera {
    use super::Duration;

    /// Number of mmap buffers requested from the driver
    pub const STREAM_BUFFERS: u32 = 4;

    /// Frames dropped after stream start so auto exposure can settle
    pub const WARMUP_FRAMES: usize = 5;

    /// Upper bound for the warm-up phase
    pub const WARMUP_TIMEOUT: Duration = Duration::from_secs(3);

    /// Square edge requested from the device when it reports no format
    pub const DEFAULT_SQUARE_EDGE: u32 = 720;
}

/// Remote generation service constants
pub mod generation {
    /// Default image generation model
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

    /// Default service endpoint
    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

    /// Header carrying the credential
    pub const API_KEY_HEADER: &str = "x-goog-api-key";

    /// Maximum characters of a model refusal shown to the user
    pub const REFUSAL_EXCERPT_CHARS: usize = 100;

    /// MIME type assumed when the image signature is not recognised
    pub const FALLBACK_MIME: &str = "image/jpeg";

    /// Environment variable holding the credential (runtime and build time)
    pub const API_KEY_ENV: &str = "PHOTOBOOTH_API_KEY";
}

/// Output constants
pub mod output {
    /// File name offered to share targets
    pub const SHARE_FILE_NAME: &str = "qatar-national-day-2025.jpg";

    /// Prefix for saved results
    pub const RESULT_FILE_PREFIX: &str = "national_day";

    /// Sub-directory under the pictures directory used by default
    pub const PICTURES_SUBDIR: &str = "photobooth";
}

/// Supported upload file formats
pub mod file_formats {
    /// Image file extensions accepted by the upload picker
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
}
