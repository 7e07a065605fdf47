// SPDX-License-Identifier: GPL-3.0-only

//! Digital zoom geometry and pinch gestures

use crate::constants::zoom;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Source rectangle kept by a digital zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Centered region covering `1 / zoom` of each dimension
///
/// The zoom is clamped first. Sizes are rounded and never below one pixel.
pub fn crop_region(width: u32, height: u32, zoom_factor: f32) -> CropRegion {
    let z = zoom::clamp(zoom_factor);
    let side = |native: u32| ((native as f32 / z).round() as u32).clamp(1, native.max(1));

    let crop_w = side(width);
    let crop_h = side(height);

    CropRegion {
        x: width.saturating_sub(crop_w) / 2,
        y: height.saturating_sub(crop_h) / 2,
        width: crop_w,
        height: crop_h,
    }
}

/// Produce the still for a frame: zoom crop, scale back to native size,
/// optional horizontal mirror
pub fn render_still(frame: &RgbImage, zoom_factor: f32, mirror: bool) -> RgbImage {
    let (width, height) = frame.dimensions();
    let region = crop_region(width, height, zoom_factor);

    let mut still = if region.width == width && region.height == height {
        frame.clone()
    } else {
        let cropped =
            imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image();
        imageops::resize(&cropped, width, height, FilterType::Triangle)
    };

    if mirror {
        imageops::flip_horizontal_in_place(&mut still);
    }
    still
}

/// Two-finger pinch zoom tracking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    start_distance: f32,
    start_zoom: f32,
}

impl PinchGesture {
    /// Record the initial touch points and the zoom at gesture start
    pub fn begin(p1: (f32, f32), p2: (f32, f32), current_zoom: f32) -> Self {
        Self {
            start_distance: distance(p1, p2),
            start_zoom: zoom::clamp(current_zoom),
        }
    }

    /// Zoom for the current touch points
    pub fn update(&self, p1: (f32, f32), p2: (f32, f32)) -> f32 {
        if self.start_distance <= f32::EPSILON {
            return self.start_zoom;
        }
        zoom::clamp(self.start_zoom * distance(p1, p2) / self.start_distance)
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}
