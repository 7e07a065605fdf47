// SPDX-License-Identifier: GPL-3.0-only

//! Filter engine
//!
//! A static catalog of eight cosmetic filters, each an ordered list of
//! [`FilterOp`]s. Filters run in two modes:
//!
//! - **Preview**: non-destructive. [`FilterId::css`] gives the descriptor a
//!   display surface applies to live frames, and [`preview`] renders a
//!   filtered copy of a frame in memory.
//! - **Bake**: destructive. [`bake`] decodes an encoded image, applies the
//!   ops and re-encodes the result as JPEG.

mod transform;

pub use transform::{FilterOp, apply_ops};

use crate::constants::quality::BAKE_JPEG;
use crate::errors::FilterError;
use crate::fl;
use crate::media::{EncodedImage, ImageEncoding, encode_jpeg};
use image::RgbImage;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Filter identifiers in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterId {
    #[default]
    Neutral,
    Sketch,
    Sepia,
    Vintage,
    Monochrome,
    Warm,
    Cool,
    Glitch,
}

/// Catalog entry
#[derive(Debug, Clone, Copy)]
pub struct FilterDefinition {
    pub id: FilterId,
    pub ops: &'static [FilterOp],
}

/// The filter catalog. The first entry is the neutral filter.
pub static CATALOG: [FilterDefinition; 8] = [
    FilterDefinition {
        id: FilterId::Neutral,
        ops: &[],
    },
    FilterDefinition {
        id: FilterId::Sketch,
        ops: &[
            FilterOp::Grayscale(1.0),
            FilterOp::Contrast(3.0),
            FilterOp::Brightness(1.2),
        ],
    },
    FilterDefinition {
        id: FilterId::Sepia,
        ops: &[FilterOp::Sepia(1.0)],
    },
    FilterDefinition {
        id: FilterId::Vintage,
        ops: &[FilterOp::Sepia(0.6), FilterOp::Contrast(1.2)],
    },
    FilterDefinition {
        id: FilterId::Monochrome,
        ops: &[FilterOp::Grayscale(1.0)],
    },
    FilterDefinition {
        id: FilterId::Warm,
        ops: &[FilterOp::Sepia(0.2), FilterOp::Saturate(1.4)],
    },
    FilterDefinition {
        id: FilterId::Cool,
        ops: &[FilterOp::HueRotate(30.0), FilterOp::Saturate(1.1)],
    },
    FilterDefinition {
        id: FilterId::Glitch,
        ops: &[
            FilterOp::Contrast(1.5),
            FilterOp::Saturate(1.5),
            FilterOp::HueRotate(180.0),
        ],
    },
];

impl FilterId {
    /// All filters in catalog order
    pub const ALL: [FilterId; 8] = [
        FilterId::Neutral,
        FilterId::Sketch,
        FilterId::Sepia,
        FilterId::Vintage,
        FilterId::Monochrome,
        FilterId::Warm,
        FilterId::Cool,
        FilterId::Glitch,
    ];

    /// Filter selected right after an image is obtained
    pub const AFTER_CAPTURE: FilterId = FilterId::Sketch;

    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterId::Neutral => "neutral",
            FilterId::Sketch => "sketch",
            FilterId::Sepia => "sepia",
            FilterId::Vintage => "vintage",
            FilterId::Monochrome => "monochrome",
            FilterId::Warm => "warm",
            FilterId::Cool => "cool",
            FilterId::Glitch => "glitch",
        }
    }

    /// Localized display label
    pub fn label(&self) -> String {
        match self {
            FilterId::Neutral => fl!("filter-neutral"),
            FilterId::Sketch => fl!("filter-sketch"),
            FilterId::Sepia => fl!("filter-sepia"),
            FilterId::Vintage => fl!("filter-vintage"),
            FilterId::Monochrome => fl!("filter-monochrome"),
            FilterId::Warm => fl!("filter-warm"),
            FilterId::Cool => fl!("filter-cool"),
            FilterId::Glitch => fl!("filter-glitch"),
        }
    }

    pub fn definition(&self) -> &'static FilterDefinition {
        // CATALOG is ordered like the enum
        &CATALOG[*self as usize]
    }

    pub fn ops(&self) -> &'static [FilterOp] {
        self.definition().ops
    }

    pub fn is_neutral(&self) -> bool {
        self.ops().is_empty()
    }

    /// CSS filter descriptor for a display surface (`none` for neutral)
    pub fn css(&self) -> String {
        if self.is_neutral() {
            return "none".to_string();
        }
        self.ops()
            .iter()
            .map(FilterOp::css)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "neutral" | "normal" | "none" => Ok(FilterId::Neutral),
            "bw" | "mono" => Ok(FilterId::Monochrome),
            other => FilterId::ALL
                .into_iter()
                .find(|id| id.as_str() == other)
                .ok_or_else(|| {
                    let known: Vec<_> = FilterId::ALL.iter().map(FilterId::as_str).collect();
                    format!("unknown filter '{}' (expected one of: {})", other, known.join(", "))
                }),
        }
    }
}

/// Render a filtered copy of a frame; the source is left untouched
pub fn preview(frame: &RgbImage, filter: FilterId) -> RgbImage {
    let mut out = frame.clone();
    apply_ops(&mut out, filter.ops());
    out
}

/// Apply a filter destructively, producing new encoded bytes
///
/// The neutral filter returns the input unchanged (same buffer). Any other
/// filter decodes the image, applies its ops and re-encodes as JPEG.
pub fn bake(image: &EncodedImage, filter: FilterId) -> Result<EncodedImage, FilterError> {
    if filter.is_neutral() {
        return Ok(image.clone());
    }

    let mut pixels = image.decode()?.to_rgb8();
    debug!(
        filter = %filter,
        width = pixels.width(),
        height = pixels.height(),
        "Baking filter"
    );

    apply_ops(&mut pixels, filter.ops());

    let jpeg = encode_jpeg(&pixels, BAKE_JPEG).map_err(|e| FilterError::Encode(e.to_string()))?;
    Ok(EncodedImage::new(jpeg, ImageEncoding::Jpeg))
}
