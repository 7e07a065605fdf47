// SPDX-License-Identifier: GPL-3.0-only

//! Encoded image values and pixel conversions
//!
//! Everything that crosses a component boundary in the booth is an
//! [`EncodedImage`]: the encoded bytes plus the encoding detected from their
//! signature. Raw pixels only exist inside the capture adapter and the
//! filter engine.
//!
//! # Modules
//!
//! - [`encoded`]: [`EncodedImage`] and [`ImageEncoding`]
//! - [`convert`]: camera pixel format to RGB conversion and JPEG encoding

pub mod convert;
pub mod encoded;

pub use convert::{encode_jpeg, yuyv_to_rgb};
pub use encoded::{EncodedImage, ImageEncoding};
