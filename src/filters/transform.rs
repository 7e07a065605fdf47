// SPDX-License-Identifier: GPL-3.0-only

//! Pixel transforms behind the filter descriptors
//!
//! Each [`FilterOp`] mirrors one CSS filter function. Colour matrices follow
//! the W3C Filter Effects module so a baked image matches what the live
//! preview showed. Every op clamps its output to `[0, 1]` before the next op
//! runs, exactly as a chain of filter primitives does.

use image::RgbImage;

/// Rec. 709 luma weights used by the grayscale/saturate/hue-rotate matrices
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

type Matrix = [[f32; 3]; 3];

/// One step of a filter chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// Amount in `[0, 1]`
    Grayscale(f32),
    /// Amount in `[0, 1]`
    Sepia(f32),
    /// Multiplier around mid-gray
    Contrast(f32),
    /// Linear multiplier
    Brightness(f32),
    /// Multiplier, 1.0 = unchanged
    Saturate(f32),
    /// Rotation in degrees
    HueRotate(f32),
}

impl FilterOp {
    /// CSS filter function for this op (e.g. `contrast(1.5)`)
    pub fn css(&self) -> String {
        match self {
            FilterOp::Grayscale(a) => format!("grayscale({})", a),
            FilterOp::Sepia(a) => format!("sepia({})", a),
            FilterOp::Contrast(c) => format!("contrast({})", c),
            FilterOp::Brightness(b) => format!("brightness({})", b),
            FilterOp::Saturate(s) => format!("saturate({})", s),
            FilterOp::HueRotate(deg) => format!("hue-rotate({}deg)", deg),
        }
    }

    /// Apply to one normalized RGB triple
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        Step::from(self).apply(rgb)
    }
}

/// Run a chain of ops over every pixel of `image` in place
pub fn apply_ops(image: &mut RgbImage, ops: &[FilterOp]) {
    if ops.is_empty() {
        return;
    }

    // Matrices are built once per image, not per pixel
    let steps: Vec<Step> = ops.iter().map(Step::from).collect();

    for pixel in image.pixels_mut() {
        let mut rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];

        for step in &steps {
            rgb = step.apply(rgb);
        }

        pixel[0] = (rgb[0] * 255.0).round() as u8;
        pixel[1] = (rgb[1] * 255.0).round() as u8;
        pixel[2] = (rgb[2] * 255.0).round() as u8;
    }
}

/// Op with its matrix precomputed
enum Step {
    Matrix(Matrix),
    Contrast(f32),
    Brightness(f32),
}

impl From<&FilterOp> for Step {
    fn from(op: &FilterOp) -> Self {
        match *op {
            FilterOp::Grayscale(a) => Step::Matrix(grayscale_matrix(a)),
            FilterOp::Sepia(a) => Step::Matrix(sepia_matrix(a)),
            FilterOp::Saturate(s) => Step::Matrix(saturate_matrix(s)),
            FilterOp::HueRotate(deg) => Step::Matrix(hue_rotate_matrix(deg)),
            FilterOp::Contrast(c) => Step::Contrast(c),
            FilterOp::Brightness(b) => Step::Brightness(b),
        }
    }
}

impl Step {
    #[inline]
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match self {
            Step::Matrix(m) => multiply(m, rgb),
            Step::Contrast(c) => rgb.map(|v| (v - 0.5) * c + 0.5),
            Step::Brightness(b) => rgb.map(|v| v * b),
        };
        out.map(|v| v.clamp(0.0, 1.0))
    }
}

#[inline]
fn multiply(m: &Matrix, [r, g, b]: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    [
        [LUMA_R + (1.0 - LUMA_R) * a, LUMA_G - LUMA_G * a, LUMA_B - LUMA_B * a],
        [LUMA_R - LUMA_R * a, LUMA_G + (1.0 - LUMA_G) * a, LUMA_B - LUMA_B * a],
        [LUMA_R - LUMA_R * a, LUMA_G - LUMA_G * a, LUMA_B + (1.0 - LUMA_B) * a],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
        [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
        [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
    ]
}

fn saturate_matrix(s: f32) -> Matrix {
    let s = s.max(0.0);
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_grayscale_equalizes_channels() {
        let [r, g, b] = FilterOp::Grayscale(1.0).apply([0.9, 0.2, 0.4]);
        assert!((r - g).abs() < 1e-3 && (g - b).abs() < 1e-3);
    }

    #[test]
    fn test_zero_amounts_are_identity() {
        let rgb = [0.3, 0.6, 0.9];
        assert!(approx(FilterOp::Grayscale(0.0).apply(rgb), rgb));
        assert!(approx(FilterOp::Sepia(0.0).apply(rgb), rgb));
        assert!(approx(FilterOp::Saturate(1.0).apply(rgb), rgb));
        assert!(approx(FilterOp::HueRotate(0.0).apply(rgb), rgb));
        assert!(approx(FilterOp::Contrast(1.0).apply(rgb), rgb));
        assert!(approx(FilterOp::Brightness(1.0).apply(rgb), rgb));
    }

    #[test]
    fn test_contrast_pushes_away_from_mid_gray() {
        let [r, _, b] = FilterOp::Contrast(3.0).apply([0.4, 0.5, 0.7]);
        assert!(r < 0.4);
        assert!((b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_output_is_clamped() {
        let out = FilterOp::Brightness(4.0).apply([0.5, 0.9, 0.1]);
        assert!(out.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_css_rendering() {
        assert_eq!(FilterOp::Contrast(1.5).css(), "contrast(1.5)");
        assert_eq!(FilterOp::HueRotate(180.0).css(), "hue-rotate(180deg)");
        assert_eq!(FilterOp::Grayscale(1.0).css(), "grayscale(1)");
    }

    #[test]
    fn test_apply_ops_matches_single_op() {
        let mut image = RgbImage::from_pixel(2, 2, image::Rgb([10, 120, 250]));
        apply_ops(&mut image, &[FilterOp::Grayscale(1.0)]);
        let p = image.get_pixel(0, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn test_pixel_and_image_paths_agree() {
        let chain = [
            FilterOp::Sepia(0.6),
            FilterOp::Contrast(1.2),
            FilterOp::HueRotate(30.0),
            FilterOp::Saturate(1.4),
        ];
        let source = [40u8, 160, 220];

        let mut image = RgbImage::from_pixel(1, 1, image::Rgb(source));
        apply_ops(&mut image, &chain);

        let rgb = chain
            .iter()
            .fold(source.map(|c| c as f32 / 255.0), |rgb, op| op.apply(rgb));
        let expected = rgb.map(|c| (c * 255.0).round() as u8);
        assert_eq!(image.get_pixel(0, 0).0, expected);
    }
}
