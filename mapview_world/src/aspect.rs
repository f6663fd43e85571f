// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aspect‑ratio correction for windows.
//!
//! A window is corrected by **growing** its smaller dimension until
//! `|width / height|` equals the viewport's `width / height`. The window
//! center and the orientation of each axis are preserved, and the window
//! never shrinks, so content requested by the caller always stays visible.
//!
//! These are pure functions over value types. [`crate::World`] applies them
//! after every mutation when it was built with [`crate::AspectMode::Preserve`],
//! and gesture previews apply them to pixel rectangles without touching a
//! live world at all.

use kurbo::Vec2;

use crate::subset::{Subset, ViewportSize};

/// Relative tolerance under which two aspect ratios are considered equal.
const ASPECT_TOLERANCE: f64 = 1e-12;

/// Grows `window` so its aspect ratio matches `viewport`.
///
/// Returns `window` unchanged when the viewport is not realized, when the
/// window is degenerate, or when the ratios already agree.
#[must_use]
pub fn fix_window_size(window: Subset, viewport: ViewportSize) -> Subset {
    if !viewport.is_realized() || window.is_degenerate() {
        return window;
    }
    let width = window.width().abs();
    let height = window.height().abs();
    let window_aspect = width / height;
    let viewport_aspect = viewport.aspect();
    if (window_aspect - viewport_aspect).abs() <= viewport_aspect * ASPECT_TOLERANCE {
        return window;
    }

    let size = if window_aspect < viewport_aspect {
        Vec2::new(height * viewport_aspect, height)
    } else {
        Vec2::new(width, width / viewport_aspect)
    };
    fix_window_position(window, size)
}

/// Re-derives `ul`/`lr` around the center of `window` for an unsigned `size`.
///
/// The sign of each axis of `window` is carried over to the result.
#[must_use]
pub fn fix_window_position(window: Subset, size: Vec2) -> Subset {
    let width = if window.width() < 0.0 {
        -size.x
    } else {
        size.x
    };
    let height = if window.height() < 0.0 {
        -size.y
    } else {
        size.y
    };
    Subset::from_center(window.center(), width, height)
}

/// Returns `true` when `window` already has the aspect ratio of `viewport`
/// (within `tolerance`), or when the check does not apply.
#[must_use]
pub fn is_aspect_consistent(window: Subset, viewport: ViewportSize, tolerance: f64) -> bool {
    if !viewport.is_realized() || window.is_degenerate() {
        return true;
    }
    (window.aspect() - viewport.aspect()).abs() < tolerance
}
