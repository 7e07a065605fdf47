// SPDX-License-Identifier: GPL-3.0-only

//! Capture device adapter
//!
//! [`CaptureAdapter`] owns a [`CameraBackend`] and the user-facing camera
//! state: facing, digital zoom and torch. It turns a live frame into an
//! encoded still. When the camera cannot be opened the adapter degrades to
//! upload-only and keeps a localized message for the capture screen.

mod geometry;
mod upload;

pub use geometry::{CropRegion, PinchGesture, crop_region, render_still};
pub use upload::{upload_from_bytes, upload_from_file};

use crate::backends::camera::{CameraBackend, Facing, StreamInfo};
use crate::constants::{quality, zoom};
use crate::errors::CaptureError;
use crate::fl;
use crate::media::{EncodedImage, ImageEncoding, encode_jpeg};
use tracing::{debug, error, info, warn};

/// Stream status
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureStatus {
    /// No stream open
    Idle,
    /// Stream running
    Live(StreamInfo),
    /// Camera unavailable; only upload is offered. Holds the message to show.
    Degraded(String),
}

pub struct CaptureAdapter<B: CameraBackend> {
    backend: B,
    facing: Facing,
    zoom: f32,
    torch_on: bool,
    torch_supported: bool,
    status: CaptureStatus,
}

impl<B: CameraBackend> CaptureAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            facing: Facing::default(),
            zoom: zoom::MIN,
            torch_on: false,
            torch_supported: false,
            status: CaptureStatus::Idle,
        }
    }

    /// Open the camera for `facing`
    ///
    /// Any running stream is stopped first. Zoom resets to 1.0 and the torch
    /// to off. On failure the adapter is left degraded (upload only).
    pub fn start(&mut self, facing: Facing) -> Result<StreamInfo, CaptureError> {
        self.stop();

        self.facing = facing;
        self.zoom = zoom::MIN;
        self.torch_on = false;

        match self.backend.open(facing) {
            Ok(info) => {
                self.torch_supported = self.backend.torch_supported();
                info!(
                    facing = %facing,
                    device = %info.device,
                    width = info.width,
                    height = info.height,
                    torch = self.torch_supported,
                    "Capture stream started"
                );
                self.status = CaptureStatus::Live(info.clone());
                Ok(info)
            }
            Err(e) => {
                warn!(facing = %facing, error = %e, "Camera unavailable, falling back to upload");
                self.torch_supported = false;
                self.status = CaptureStatus::Degraded(fl!("camera-access-failed"));
                Err(CaptureError::DeviceUnavailable(e.to_string()))
            }
        }
    }

    /// Release the camera
    pub fn stop(&mut self) {
        if self.backend.is_open() {
            if self.torch_on
                && let Err(e) = self.backend.set_torch(false)
            {
                debug!(error = %e, "Torch off failed during stop");
            }
            self.backend.close();
            debug!("Capture stream stopped");
        }
        self.torch_on = false;
        self.torch_supported = false;
        if matches!(self.status, CaptureStatus::Live(_)) {
            self.status = CaptureStatus::Idle;
        }
    }

    /// Set the digital zoom, clamped to the supported range
    pub fn set_zoom(&mut self, value: f32) -> f32 {
        self.zoom = zoom::clamp(value);
        self.zoom
    }

    /// Apply the zoom produced by an ongoing pinch
    pub fn pinch(&mut self, gesture: &PinchGesture, p1: (f32, f32), p2: (f32, f32)) -> f32 {
        self.set_zoom(gesture.update(p1, p2))
    }

    /// Start a pinch gesture at the current zoom
    pub fn begin_pinch(&self, p1: (f32, f32), p2: (f32, f32)) -> PinchGesture {
        PinchGesture::begin(p1, p2, self.zoom)
    }

    /// Flip the torch; returns the resulting torch state
    ///
    /// Does nothing without torch support. A hardware failure is logged and
    /// leaves the state unchanged.
    pub fn toggle_torch(&mut self) -> bool {
        if !self.torch_supported || !self.is_live() {
            let err = CaptureError::TorchUnsupported;
            debug!(error = %err, "Torch toggle ignored");
            return self.torch_on;
        }

        let wanted = !self.torch_on;
        match self.backend.set_torch(wanted) {
            Ok(()) => self.torch_on = wanted,
            Err(e) => {
                let err = CaptureError::TorchFailure(e.to_string());
                error!(error = %err, "Error toggling torch");
            }
        }
        self.torch_on
    }

    /// Restart with the opposite camera
    pub fn switch_facing(&mut self) -> Result<StreamInfo, CaptureError> {
        self.start(self.facing.opposite())
    }

    /// Grab the current frame and encode it as a still
    ///
    /// The zoom crop is scaled back to the native frame size. Front camera
    /// stills are mirrored so they match the preview.
    pub fn capture(&mut self) -> Result<EncodedImage, CaptureError> {
        if !self.is_live() {
            return Err(CaptureError::NoStream);
        }

        let frame = self
            .backend
            .grab_frame()
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        let still = render_still(&frame, self.zoom, self.facing.is_mirrored());
        let jpeg = encode_jpeg(&still, quality::CAPTURE_JPEG)
            .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;

        info!(
            width = still.width(),
            height = still.height(),
            zoom = self.zoom,
            mirrored = self.facing.is_mirrored(),
            bytes = jpeg.len(),
            "Still captured"
        );
        Ok(EncodedImage::new(jpeg, ImageEncoding::Jpeg))
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    pub fn torch_supported(&self) -> bool {
        self.torch_supported
    }

    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    pub fn is_live(&self) -> bool {
        matches!(self.status, CaptureStatus::Live(_))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: CameraBackend> Drop for CaptureAdapter<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
