//! Rectangles, viewports, and the page-space to viewport-pixel transform.
//!
//! Page space is whatever coordinate system the rendering backend emits text
//! runs in. Viewport space is the rendered page in pixels. Every rectangle
//! that leaves this crate is normalized against the viewport so callers can
//! scale it into their own on-screen coordinates.

use serde::{Deserialize, Serialize};

/// The identity 2x3 affine matrix: [a, b, c, d, e, f].
pub const IDENTITY_MATRIX: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Converts page-space points into viewport pixels.
///
/// The rendering collaborator implements this for whatever viewport model it
/// uses. [`Viewport`] is the plain affine implementation.
pub trait ViewportTransform {
    /// Viewport width in pixels.
    fn width(&self) -> f64;

    /// Viewport height in pixels.
    fn height(&self) -> f64;

    /// Map a page-space point into viewport pixels.
    fn to_viewport_point(&self, x: f64, y: f64) -> (f64, f64);
}

/// A rendered page viewport: pixel dimensions plus an affine transform from
/// page space into those pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default = "identity")]
    pub transform: [f64; 6],
}

fn identity() -> [f64; 6] {
    IDENTITY_MATRIX
}

impl Viewport {
    /// A viewport whose page space is already in pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            transform: IDENTITY_MATRIX,
        }
    }

    /// A viewport for a bottom-left-origin page (PDF user space) rendered at
    /// `scale` pixels per unit.
    pub fn flipped(page_width: f64, page_height: f64, scale: f64) -> Self {
        Self {
            width: page_width * scale,
            height: page_height * scale,
            transform: [scale, 0.0, 0.0, -scale, 0.0, page_height * scale],
        }
    }
}

impl ViewportTransform for Viewport {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn to_viewport_point(&self, x: f64, y: f64) -> (f64, f64) {
        apply_matrix(&self.transform, x, y)
    }
}

/// Apply an affine matrix `[a, b, c, d, e, f]` to a point.
pub fn apply_matrix(m: &[f64; 6], x: f64, y: f64) -> (f64, f64) {
    (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5])
}

/// A rectangle expressed as fractions of the viewport, each edge in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl NormalizedRect {
    /// Normalize a pixel rectangle against viewport dimensions.
    pub fn from_pixels(left: f64, top: f64, right: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            top: normalize(top, height),
            left: normalize(left, width),
            right: normalize(right, width),
            bottom: normalize(bottom, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Tag this rectangle with the page it belongs to.
    pub fn on_page(self, page: u32) -> Rect {
        Rect {
            top: self.top,
            left: self.left,
            right: self.right,
            bottom: self.bottom,
            page,
        }
    }
}

/// A normalized highlight rectangle on a specific page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub page: u32,
}

impl Rect {
    /// Scale into pixel coordinates `(left, top, right, bottom)` of a
    /// viewport with the given dimensions.
    pub fn to_pixels(&self, width: f64, height: f64) -> (f64, f64, f64, f64) {
        (
            self.left * width,
            self.top * height,
            self.right * width,
            self.bottom * height,
        )
    }
}

/// Divide by `extent` and clamp into `[0, 1]`. A degenerate extent or a
/// non-finite result collapses to 0.
fn normalize(value: f64, extent: f64) -> f64 {
    if !extent.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    let ratio = value / extent;
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
