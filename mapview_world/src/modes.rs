// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Whether a [`crate::World`] keeps its window aspect in step with the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AspectMode {
    /// Store windows verbatim; X and Y may be scaled differently.
    #[default]
    Free,
    /// Grow the window after every mutation so that its aspect ratio matches
    /// the viewport's. See [`crate::aspect`].
    Preserve,
}

/// Whether a mutation notifies registered viewers.
///
/// Consulted by [`crate::World::set_window_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Notify {
    /// Notify viewers once the mutation is committed.
    #[default]
    Viewers,
    /// Commit silently.
    Suppress,
}

/// Direction of a point conversion through [`crate::World::transform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Window (world units) to viewport (pixels).
    Forward,
    /// Viewport (pixels) to window (world units).
    Inverse,
}
