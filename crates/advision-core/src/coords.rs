//! Normalized and pixel-space coordinates.
//!
//! Detectors report positions as fractions of the frame (`[0, 1]`, origin at
//! the bottom-left, Y pointing up). Everything here is plain arithmetic: no
//! clamping and no validation. Callers that need in-bounds values check them
//! with [`PixelRect::contains_rect`] or [`Size::is_degenerate`].

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Resolution-independent point, each component a fraction of the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

/// Point in source-image pixel space (bottom-left origin, like the detector).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub origin: NormalizedPoint,
    pub size: Size,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub origin: PixelPoint,
    pub size: Size,
}

impl NormalizedPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale into pixel space of an image of `size`.
    #[inline]
    pub fn scaled(self, size: Size) -> PixelPoint {
        PixelPoint {
            x: self.x * size.width,
            y: self.y * size.height,
        }
    }

    /// Linear remap `x * to.width / from.width` (same for `y`).
    ///
    /// A zero component in `from` yields NaN or infinity.
    #[inline]
    pub fn remapped(self, from: Size, to: Size) -> NormalizedPoint {
        NormalizedPoint {
            x: self.x * to.width / from.width,
            y: self.y * to.height / from.height,
        }
    }
}

impl PixelPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_point2(self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

impl From<PixelPoint> for Point2<f32> {
    fn from(p: PixelPoint) -> Self {
        p.to_point2()
    }
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `true` when either side is zero, negative or not a number.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

impl NormalizedRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: NormalizedPoint::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Scale origin and size independently into pixel space.
    ///
    /// The result is not clamped to `[0, size]`.
    pub fn scaled(self, size: Size) -> PixelRect {
        PixelRect {
            origin: self.origin.scaled(size),
            size: Size {
                width: self.size.width * size.width,
                height: self.size.height * size.height,
            },
        }
    }
}

impl PixelRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: PixelPoint::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle covering a whole image of `size`.
    pub const fn extent(size: Size) -> Self {
        Self {
            origin: PixelPoint::new(0.0, 0.0),
            size,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// `true` when `other` lies entirely inside `self` (shared edges allowed).
    ///
    /// Any NaN coordinate makes the check fail.
    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn contains_point(&self, p: PixelPoint) -> bool {
        p.x >= self.min_x() && p.y >= self.min_y() && p.x <= self.max_x() && p.y <= self.max_y()
    }
}

/// Free-function form of [`NormalizedPoint::scaled`].
#[inline]
pub fn scale_point(point: NormalizedPoint, to: Size) -> PixelPoint {
    point.scaled(to)
}

/// Free-function form of [`NormalizedPoint::remapped`].
#[inline]
pub fn remap_point(point: NormalizedPoint, from: Size, to: Size) -> NormalizedPoint {
    point.remapped(from, to)
}

/// Free-function form of [`NormalizedRect::scaled`].
#[inline]
pub fn scale_rect(rect: NormalizedRect, to: Size) -> PixelRect {
    rect.scaled(to)
}
