// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Opens `/dev/video*` capture nodes through the `v4l` crate, negotiates a
//! square MJPG or YUYV format and decodes frames to RGB. Torch control goes
//! through the sysfs LED interface in [`crate::flash`].

use super::{BackendError, BackendResult, CameraBackend, CameraDevice, Facing, StreamInfo};
use crate::constants::camera::{DEFAULT_SQUARE_EDGE, STREAM_BUFFERS, WARMUP_FRAMES, WARMUP_TIMEOUT};
use crate::flash::FlashHardware;
use crate::media::yuyv_to_rgb;
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Pixel formats we can decode, in order of preference
const PREFERRED_FORMATS: [&[u8; 4]; 2] = [b"MJPG", b"YUYV"];

/// Scan `/dev/video*` for nodes that can capture video
pub fn enumerate_devices() -> Vec<CameraDevice> {
    let mut paths: Vec<_> = std::fs::read_dir("/dev")
        .into_iter()
        .flatten()
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("video"))
        })
        .collect();
    paths.sort();

    let mut devices = Vec::new();
    for path in paths {
        let path_str = path.to_string_lossy().to_string();
        let Ok(dev) = Device::with_path(&path) else {
            continue;
        };
        let Ok(caps) = dev.query_caps() else {
            continue;
        };
        if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
            continue;
        }
        // Metadata nodes advertise capture too but expose no image formats
        if dev.enum_formats().map(|f| f.is_empty()).unwrap_or(true) {
            debug!(path = %path_str, "Skipping node without image formats");
            continue;
        }

        debug!(path = %path_str, card = %caps.card, driver = %caps.driver, "Found capture device");
        devices.push(CameraDevice {
            camera_location: CameraDevice::location_from_name(&caps.card),
            name: caps.card,
            path: path_str,
            driver: caps.driver,
        });
    }
    devices
}

/// Choose the device for a facing
///
/// A configured path wins. Otherwise a device whose name hints at the facing
/// is used, then the first device for `User` and the second for
/// `Environment`, then whatever is first.
pub fn select_device(
    devices: &[CameraDevice],
    facing: Facing,
    configured: Option<&str>,
) -> Option<CameraDevice> {
    if let Some(path) = configured {
        return Some(
            devices
                .iter()
                .find(|d| d.path == path)
                .cloned()
                .unwrap_or_else(|| CameraDevice {
                    name: path.to_string(),
                    path: path.to_string(),
                    driver: String::new(),
                    camera_location: None,
                }),
        );
    }

    if let Some(hinted) = devices.iter().find(|d| d.facing_hint() == Some(facing)) {
        return Some(hinted.clone());
    }

    let index = match facing {
        Facing::User => 0,
        Facing::Environment => 1,
    };
    devices.get(index).or_else(|| devices.first()).cloned()
}

/// Open device plus the format it agreed to
struct OpenDevice {
    device: Device,
    format: Format,
    info: StreamInfo,
}

/// V4L2 implementation of [`CameraBackend`]
pub struct V4l2Backend {
    front_camera: Option<String>,
    back_camera: Option<String>,
    open: Option<OpenDevice>,
    torch: FlashHardware,
    facing: Facing,
}

impl V4l2Backend {
    /// Create a backend, optionally pinning device paths per facing
    pub fn new(front_camera: Option<String>, back_camera: Option<String>) -> Self {
        Self {
            front_camera,
            back_camera,
            open: None,
            torch: FlashHardware::default(),
            facing: Facing::default(),
        }
    }

    fn negotiate(device: &Device) -> BackendResult<Format> {
        let offered: Vec<FourCC> = device
            .enum_formats()
            .map_err(|e| BackendError::FormatNotSupported(e.to_string()))?
            .into_iter()
            .map(|d| d.fourcc)
            .collect();

        let fourcc = PREFERRED_FORMATS
            .iter()
            .map(|code| FourCC::new(code))
            .find(|f| offered.contains(f))
            .ok_or_else(|| {
                BackendError::FormatNotSupported(format!(
                    "device offers {:?}, need MJPG or YUYV",
                    offered
                ))
            })?;

        let request = Format::new(DEFAULT_SQUARE_EDGE, DEFAULT_SQUARE_EDGE, fourcc);
        let agreed = device
            .set_format(&request)
            .map_err(|e| BackendError::FormatNotSupported(e.to_string()))?;

        if agreed.width != agreed.height {
            debug!(
                width = agreed.width,
                height = agreed.height,
                "Driver ignored square request, frames will be center-cropped"
            );
        }
        Ok(agreed)
    }
}

impl CameraBackend for V4l2Backend {
    fn open(&mut self, facing: Facing) -> BackendResult<StreamInfo> {
        let configured = match facing {
            Facing::User => self.front_camera.as_deref(),
            Facing::Environment => self.back_camera.as_deref(),
        };
        let devices = enumerate_devices();
        let selected = select_device(&devices, facing, configured)
            .ok_or_else(|| BackendError::DeviceNotFound("no video capture devices".into()))?;

        let device = Device::with_path(&selected.path)
            .map_err(|e| BackendError::InitializationFailed(format!("{}: {}", selected.path, e)))?;
        let format = Self::negotiate(&device)?;

        let edge = format.width.min(format.height);
        let info = StreamInfo {
            device: selected.path.clone(),
            width: edge,
            height: edge,
            pixel_format: format.fourcc.to_string(),
        };

        // Sysfs LEDs sit next to the rear sensor
        self.torch = match facing {
            Facing::Environment => FlashHardware::detect(),
            Facing::User => FlashHardware::default(),
        };
        self.facing = facing;

        info!(
            device = %selected.path,
            name = %selected.name,
            facing = %facing,
            width = format.width,
            height = format.height,
            fourcc = %format.fourcc,
            torch = self.torch.has_devices(),
            torch_blocked = self.torch.unwritable.len(),
            "Camera opened"
        );

        self.open = Some(OpenDevice {
            device,
            format,
            info: info.clone(),
        });
        Ok(info)
    }

    fn close(&mut self) {
        if let Some(open) = self.open.take() {
            if self.torch.has_devices()
                && let Err(e) = self.torch.set_all(false)
            {
                warn!(error = %e, "Failed to switch torch off while closing");
            }
            info!(device = %open.info.device, "Camera closed");
        }
        self.torch = FlashHardware::default();
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn torch_supported(&self) -> bool {
        self.open.is_some() && self.torch.has_devices()
    }

    fn set_torch(&mut self, on: bool) -> BackendResult<()> {
        if !self.torch_supported() {
            return Err(BackendError::NotAvailable(format!(
                "no torch for the {} camera",
                self.facing
            )));
        }
        self.torch.set_all(on)?;
        debug!(on, "Torch switched");
        Ok(())
    }

    fn grab_frame(&mut self) -> BackendResult<RgbImage> {
        let open = self.open.as_mut().ok_or(BackendError::NotStreaming)?;

        let mut stream = MmapStream::with_buffers(&mut open.device, Type::VideoCapture, STREAM_BUFFERS)
            .map_err(|e| BackendError::IoError(format!("failed to start stream: {}", e)))?;

        // Let auto exposure settle before keeping a frame
        let started = Instant::now();
        for dropped in 0..WARMUP_FRAMES {
            if started.elapsed() > WARMUP_TIMEOUT {
                debug!(dropped, "Warm-up timed out");
                break;
            }
            stream.next()?;
        }

        let (buf, meta) = stream.next()?;
        let used = (meta.bytesused as usize).min(buf.len());
        let data = if used > 0 { &buf[..used] } else { buf };

        let frame = decode_frame(data, &open.format)?;
        Ok(crop_to_square(frame))
    }
}

impl Drop for V4l2Backend {
    fn drop(&mut self) {
        self.close();
    }
}

fn decode_frame(data: &[u8], format: &Format) -> BackendResult<RgbImage> {
    if format.fourcc == FourCC::new(b"MJPG") {
        image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
            .map(|img| img.to_rgb8())
            .map_err(|e| BackendError::IoError(format!("MJPG decode failed: {}", e)))
    } else {
        let rgb = yuyv_to_rgb(data, format.width, format.height);
        RgbImage::from_raw(format.width, format.height, rgb)
            .ok_or_else(|| BackendError::IoError("YUYV frame size mismatch".into()))
    }
}

/// Center-crop a frame to its shorter edge
fn crop_to_square(frame: RgbImage) -> RgbImage {
    let (w, h) = frame.dimensions();
    if w == h {
        return frame;
    }
    let edge = w.min(h);
    image::imageops::crop_imm(&frame, (w - edge) / 2, (h - edge) / 2, edge, edge).to_image()
}
