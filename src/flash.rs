// SPDX-License-Identifier: GPL-3.0-only

//! Torch LED control via Linux sysfs
//!
//! Discovers LEDs exposed at `/sys/class/leds/*:flash` and drives them in
//! torch mode through the `brightness` file, which is group-writable on
//! most phones (`feedbackd`), unlike the root-only strobe interface.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default sysfs directory holding LED class devices
pub const SYSFS_LEDS: &str = "/sys/class/leds";

/// A torch LED discovered via sysfs
#[derive(Debug, Clone)]
pub struct FlashDevice {
    /// e.g. `/sys/class/leds/white:flash`
    path: PathBuf,
    max_brightness: u32,
    name: String,
}

impl FlashDevice {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set raw brightness value (0 = off, max_brightness = full)
    pub fn set_brightness(&self, value: u32) -> io::Result<()> {
        let clamped = value.min(self.max_brightness);
        std::fs::write(self.path.join("brightness"), clamped.to_string())
    }

    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }

    /// Turn on at a fraction of max brightness (0.0 = off, 1.0 = full)
    pub fn torch(&self, intensity: f32) -> io::Result<()> {
        let clamped = intensity.clamp(0.0, 1.0);
        let value = (clamped * self.max_brightness as f32).round() as u32;
        self.set_brightness(value)
    }
}

/// Torch LEDs found on this machine
#[derive(Debug, Clone, Default)]
pub struct FlashHardware {
    /// Devices we can write to
    pub devices: Vec<FlashDevice>,
    /// LEDs that exist but whose brightness file is not writable
    pub unwritable: Vec<String>,
}

impl FlashHardware {
    /// Scan the system LED directory
    pub fn detect() -> FlashHardware {
        Self::detect_in(Path::new(SYSFS_LEDS))
    }

    /// Scan `root` for `*:flash` entries
    pub fn detect_in(root: &Path) -> FlashHardware {
        let Ok(entries) = std::fs::read_dir(root) else {
            debug!(path = %root.display(), "No LED class directory, torch unavailable");
            return FlashHardware::default();
        };

        let mut hardware = FlashHardware::default();

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.ends_with(":flash") {
                continue;
            }

            let led_path = entry.path();
            let Some(max_brightness) = read_max_brightness(&led_path) else {
                continue;
            };

            let brightness_path = led_path.join("brightness");
            match std::fs::OpenOptions::new().write(true).open(&brightness_path) {
                Ok(_) => {
                    info!(name, max_brightness, "Discovered torch LED");
                    hardware.devices.push(FlashDevice {
                        path: led_path,
                        max_brightness,
                        name: name.to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        path = %brightness_path.display(),
                        error = %e,
                        "Torch LED found but not writable (user may need the 'feedbackd' group)"
                    );
                    hardware.unwritable.push(name.to_string());
                }
            }
        }

        // white before yellow
        hardware.devices.sort_by(|a, b| a.name.cmp(&b.name));
        hardware
    }

    pub fn has_devices(&self) -> bool {
        !self.devices.is_empty()
    }

    /// Drive every LED on (full brightness) or off
    ///
    /// Stops at the first failing LED and returns its error.
    pub fn set_all(&self, on: bool) -> io::Result<()> {
        for dev in &self.devices {
            let result = if on { dev.torch(1.0) } else { dev.off() };
            if let Err(e) = result {
                warn!(device = %dev.name, on, error = %e, "Failed to drive torch LED");
                return Err(e);
            }
        }
        Ok(())
    }
}

fn read_max_brightness(led_path: &Path) -> Option<u32> {
    let path = led_path.join("max_brightness");
    match std::fs::read_to_string(&path) {
        Ok(s) => match s.trim().parse::<u32>() {
            Ok(v) if v > 0 => Some(v),
            _ => {
                warn!(path = %path.display(), "Invalid max_brightness value");
                None
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read max_brightness");
            None
        }
    }
}
