// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   CaptureAdapter    │  ← zoom, facing, torch, still encoding
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← open / grab / torch
//! └──────────┬──────────┘
//!            │
//!            ▼
//!        ┌──────┐
//!        │ V4L2 │  ← Concrete implementation
//!        └──────┘
//! ```

pub mod types;
pub mod v4l2;

pub use types::*;
pub use v4l2::V4l2Backend;

use image::RgbImage;

/// Platform camera seam
///
/// Implementations own the device handle. Frames are delivered as packed
/// RGB at the size reported in [`StreamInfo`].
pub trait CameraBackend: Send {
    /// Open the camera for `facing`, requesting a square frame
    ///
    /// Any previously open device must be closed by the caller first.
    fn open(&mut self, facing: Facing) -> BackendResult<StreamInfo>;

    /// Release the device. Safe to call when nothing is open.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Whether the open device has a controllable torch
    fn torch_supported(&self) -> bool;

    /// Switch the torch on or off
    fn set_torch(&mut self, on: bool) -> BackendResult<()>;

    /// Grab one frame from the live stream
    fn grab_frame(&mut self) -> BackendResult<RgbImage>;
}
