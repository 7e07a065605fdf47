// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera capture
//!
//! Hardware access lives behind [`camera::CameraBackend`] so the capture
//! adapter and tests never touch device nodes directly.
//!
//! # Modules
//!
//! - [`camera`]: camera backend trait, shared types and the V4L2 implementation

pub mod camera;
