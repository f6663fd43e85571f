// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Vec2};

/// Axis‑aligned rectangle in world coordinates, described by its
/// upper‑left and lower‑right corners.
///
/// Unlike [`kurbo::Rect`], a `Subset` is **not** normalized: `lr - ul` may be
/// negative on either axis. Geographic data commonly has Y growing upward
/// while pixels grow downward, and the sign of each axis carries that
/// orientation through every transform.
///
/// A subset with zero extent on either axis, or with a non‑finite corner, is
/// [degenerate](Subset::is_degenerate). Transforms through a degenerate
/// window are undefined, so [`crate::World`] refuses to store one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subset {
    /// Upper‑left corner.
    pub ul: Point,
    /// Lower‑right corner.
    pub lr: Point,
}

impl Subset {
    /// A subset with both corners at the origin.
    pub const ZERO: Self = Self {
        ul: Point::ZERO,
        lr: Point::ZERO,
    };

    /// Creates a subset from its two corners.
    #[must_use]
    pub const fn new(ul: Point, lr: Point) -> Self {
        Self { ul, lr }
    }

    /// Creates a subset from raw corner coordinates.
    #[must_use]
    pub const fn from_coords(ul_x: f64, ul_y: f64, lr_x: f64, lr_y: f64) -> Self {
        Self {
            ul: Point::new(ul_x, ul_y),
            lr: Point::new(lr_x, lr_y),
        }
    }

    /// Creates a subset of the given signed size centered on `center`.
    #[must_use]
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let half = Vec2::new(width * 0.5, height * 0.5);
        Self {
            ul: center - half,
            lr: center + half,
        }
    }

    /// Signed extent along X (`lr.x - ul.x`).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.lr.x - self.ul.x
    }

    /// Signed extent along Y (`lr.y - ul.y`).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.lr.y - self.ul.y
    }

    /// Signed extent as a vector (`lr - ul`).
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        self.lr - self.ul
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        self.ul.midpoint(self.lr)
    }

    /// Ratio `|width / height|`. NaN or infinite for degenerate subsets.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        (self.width() / self.height()).abs()
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.ul.is_finite() && self.lr.is_finite()
    }

    /// Returns `true` if either extent is zero or any coordinate is not finite.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.width() == 0.0 || self.height() == 0.0
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            ul: self.ul + delta,
            lr: self.lr + delta,
        }
    }

    /// Returns a copy scaled by `factor` about `anchor`.
    ///
    /// `anchor` keeps its relative position inside the subset, so a point
    /// lying at 30% of the width stays at 30% after scaling.
    #[must_use]
    pub fn scaled_about(&self, anchor: Point, factor: f64) -> Self {
        Self {
            ul: anchor + (self.ul - anchor) * factor,
            lr: anchor + (self.lr - anchor) * factor,
        }
    }

    /// Returns the same area with `ul` at the minimum corner.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            ul: Point::new(self.ul.x.min(self.lr.x), self.ul.y.min(self.lr.y)),
            lr: Point::new(self.ul.x.max(self.lr.x), self.ul.y.max(self.lr.y)),
        }
    }

    /// Smallest subset covering both `self` and `other`.
    ///
    /// The result keeps the axis orientation of `self`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        let min = Point::new(a.ul.x.min(b.ul.x), a.ul.y.min(b.ul.y));
        let max = Point::new(a.lr.x.max(b.lr.x), a.lr.y.max(b.lr.y));
        let (ul_x, lr_x) = if self.width() < 0.0 {
            (max.x, min.x)
        } else {
            (min.x, max.x)
        };
        let (ul_y, lr_y) = if self.height() < 0.0 {
            (max.y, min.y)
        } else {
            (min.y, max.y)
        };
        Self::from_coords(ul_x, ul_y, lr_x, lr_y)
    }

    /// Normalized [`Rect`] covering the same area.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.ul, self.lr)
    }

    /// Compares corners with an absolute tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.ul.x - other.ul.x).abs() <= tolerance
            && (self.ul.y - other.ul.y).abs() <= tolerance
            && (self.lr.x - other.lr.x).abs() <= tolerance
            && (self.lr.y - other.lr.y).abs() <= tolerance
    }
}

impl From<Rect> for Subset {
    fn from(rect: Rect) -> Self {
        Self::from_coords(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}

/// Size of the on‑screen pixel rectangle.
///
/// A zero dimension means the surface has not been realized yet; no
/// transform is attempted until both dimensions are positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ViewportSize {
    /// Creates a viewport size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` once both dimensions are non‑zero.
    #[must_use]
    pub fn is_realized(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height. Only meaningful when realized.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Size as a vector of floats.
    #[must_use]
    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(f64::from(self.width), f64::from(self.height))
    }

    /// Pixel rectangle `[0, 0] × [width, height]`.
    #[must_use]
    pub fn to_subset(&self) -> Subset {
        Subset::from_coords(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Clamps each dimension to `max`.
    #[must_use]
    pub fn clamp_to(&self, max: Self) -> Self {
        Self {
            width: self.width.min(max.width),
            height: self.height.min(max.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{Subset, ViewportSize};

    #[test]
    fn signed_extents_follow_corner_order() {
        let flipped = Subset::from_coords(0.0, 100.0, 50.0, 0.0);
        assert_eq!(flipped.width(), 50.0);
        assert_eq!(flipped.height(), -100.0);
        assert_eq!(flipped.center(), Point::new(25.0, 50.0));
        assert_eq!(flipped.aspect(), 0.5);
    }

    #[test]
    fn degenerate_detection() {
        assert!(Subset::ZERO.is_degenerate());
        assert!(Subset::from_coords(0.0, 0.0, 10.0, 0.0).is_degenerate());
        assert!(Subset::from_coords(0.0, 0.0, f64::NAN, 10.0).is_degenerate());
        assert!(Subset::from_coords(0.0, 0.0, f64::INFINITY, 10.0).is_degenerate());
        assert!(!Subset::from_coords(0.0, 10.0, 10.0, 0.0).is_degenerate());
    }

    #[test]
    fn union_covers_both_and_keeps_orientation() {
        let a = Subset::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = Subset::from_coords(5.0, 5.0, 20.0, 20.0);
        assert_eq!(a.union(&b), Subset::from_coords(0.0, 0.0, 20.0, 20.0));

        // North-up geographic extents: ul.y is the larger value.
        let north_up = Subset::from_coords(0.0, 10.0, 10.0, 0.0);
        let other = Subset::from_coords(-5.0, 5.0, 5.0, -5.0);
        assert_eq!(
            north_up.union(&other),
            Subset::from_coords(-5.0, 10.0, 10.0, -5.0)
        );
    }

    #[test]
    fn scaled_about_keeps_anchor_fixed() {
        let s = Subset::from_coords(0.0, 0.0, 100.0, 50.0);
        let anchor = Point::new(30.0, 10.0);
        let z = s.scaled_about(anchor, 0.5);
        assert_eq!(z, Subset::from_coords(15.0, 5.0, 65.0, 30.0));
        // Relative position of the anchor is unchanged.
        assert!(((anchor.x - z.ul.x) / z.width() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn viewport_clamp_and_realization() {
        let vp = ViewportSize::new(4000, 300);
        assert!(vp.is_realized());
        assert!(!ViewportSize::new(0, 300).is_realized());
        assert_eq!(
            vp.clamp_to(ViewportSize::new(1920, 1080)),
            ViewportSize::new(1920, 300)
        );
    }
}
