// SPDX-License-Identifier: GPL-3.0-only

//! Booth configuration
//!
//! Read from `<config_dir>/photobooth/config.toml`. A missing or malformed
//! file falls back to defaults so the booth always starts.

use crate::backends::camera::Facing;
use crate::constants::generation::{API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::constants::output::PICTURES_SUBDIR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory name under the platform config directory
const CONFIG_DIR_NAME: &str = "photobooth";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Credential baked in at build time, if any
const BUILD_API_KEY: Option<&str> = option_env!("PHOTOBOOTH_API_KEY");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credential for the generation service
    pub api_key: Option<String>,
    /// Image generation model
    pub model: String,
    /// Service base URL
    pub endpoint: String,
    /// Where results are saved (defaults to the pictures directory)
    pub output_dir: Option<PathBuf>,
    /// Camera opened when capture starts
    pub default_facing: Facing,
    /// Device node of the front camera, e.g. `/dev/video0`
    pub front_camera: Option<String>,
    /// Device node of the rear camera
    pub back_camera: Option<String>,
    /// Print document contents
    pub print: PrintSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output_dir: None,
            default_facing: Facing::User,
            front_camera: None,
            back_camera: None,
            print: PrintSettings::default(),
        }
    }
}

/// A role and the person holding it, printed in the document footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub role: String,
    pub name: String,
}

impl Signatory {
    fn new(role: &str, name: &str) -> Self {
        Self {
            role: role.to_string(),
            name: name.to_string(),
        }
    }
}

/// Header and footer lines of the printed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSettings {
    /// Organization shown above the title
    pub organization: String,
    /// Footer signatures, laid out right to left
    pub signatories: Vec<Signatory>,
    /// Motto line under the signatures
    pub vision: Option<String>,
    /// Credits line at the very bottom
    pub credits: Option<String>,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            organization: "مدرسة الشمال الابتدائية للبنات".to_string(),
            signatories: vec![
                Signatory::new("النائبة الأكاديمية", "لولوة السادة"),
                Signatory::new("النائبة الإدارية", "عائشة شمسان السادة"),
                Signatory::new("مديرة المدرسة", "مريم مبارك الحسيني"),
            ],
            vision: Some("الرؤية: متعلم ريادي تنمية مستدامة".to_string()),
            credits: Some("إعداد وتنفيذ / إيمان محمود".to_string()),
        }
    }
}

impl Config {
    /// Load from the default location, using defaults on any problem
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        }
    }

    /// Load from `path`, using defaults if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// `<config_dir>/photobooth/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Credential with precedence: config file, runtime environment, build time
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(
            self.api_key.as_deref(),
            std::env::var(API_KEY_ENV).ok(),
            BUILD_API_KEY,
        )
    }

    /// Directory results are saved to
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }
}

/// Pick the first non-blank credential
pub fn resolve_api_key(
    file: Option<&str>,
    runtime: Option<String>,
    build: Option<&str>,
) -> Option<String> {
    let usable = |k: &str| !k.trim().is_empty();

    file.filter(|k| usable(k))
        .map(str::to_string)
        .or_else(|| runtime.filter(|k| usable(k)))
        .or_else(|| build.filter(|k| usable(k)).map(str::to_string))
}

fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(PICTURES_SUBDIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_key_precedence() {
        assert_eq!(
            resolve_api_key(Some("file"), Some("env".into()), Some("build")),
            Some("file".to_string())
        );
        assert_eq!(
            resolve_api_key(None, Some("env".into()), Some("build")),
            Some("env".to_string())
        );
        assert_eq!(
            resolve_api_key(Some(""), Some("  ".into()), Some("build")),
            Some("build".to_string())
        );
        assert_eq!(resolve_api_key(Some(" "), None, Some("")), None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("model = \"custom-model\"").unwrap();
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.print.signatories.len(), 3);
    }

    #[test]
    fn test_output_dir_override() {
        let config = Config {
            output_dir: Some(PathBuf::from("/tmp/booth")),
            ..Default::default()
        };
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/booth"));
        assert!(Config::default().output_dir().ends_with(PICTURES_SUBDIR));
    }
}
