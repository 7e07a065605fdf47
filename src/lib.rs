// SPDX-License-Identifier: GPL-3.0-only

//! Photobooth - a festive portrait booth
//!
//! A visitor captures a square portrait (or uploads one), picks an artistic
//! filter, and a remote generative-image service places them in front of a
//! National Day scene. The result can be saved, shared or printed.
//!
//! # Architecture
//!
//! - [`app`]: Session state machine and the booth controller
//! - [`capture`]: Camera adapter (zoom, torch, facing) and file upload
//! - [`backends`]: Camera backend abstraction over V4L2
//! - [`filters`]: Filter catalog, live preview and bake
//! - [`generation`]: Request building and the remote generation client
//! - [`output`]: Share and print actions
//! - [`media`]: Encoded image buffers and pixel conversions
//! - [`config`]: User configuration handling
//! - [`storage`]: Saving results to disk

pub mod app;
pub mod backends;
pub mod capture;
pub mod config;
pub mod constants;
pub mod errors;
pub mod filters;
pub mod flash;
pub mod generation;
pub mod i18n;
pub mod media;
pub mod output;
pub mod storage;

// Re-export commonly used types
pub use app::{Message, Photobooth, Session, Step};
pub use config::Config;
pub use errors::{AppError, CaptureError, FilterError, GenerationError, OutputError};
pub use filters::FilterId;
pub use media::EncodedImage;
