// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit window propagation between viewers.
//!
//! Worlds never share state and never broadcast to each other. A dependent
//! viewer *pulls* from a source snapshot when it wants to follow, typically
//! at the start of its own paint pass:
//!
//! ```
//! use mapview_world::link::{LinkFollower, LinkMode};
//! use mapview_world::{Subset, World};
//!
//! let mut overview = World::new();
//! overview.set_world(Subset::from_coords(0.0, 0.0, 100.0, 100.0)).unwrap();
//! overview.set_window(Subset::from_coords(10.0, 10.0, 20.0, 20.0)).unwrap();
//!
//! let mut detail = World::new();
//! let mut follower = LinkFollower::new(LinkMode::Window);
//! assert!(follower.pull(&overview.state(), &mut detail).unwrap());
//! assert_eq!(detail.window(), overview.window());
//!
//! // Nothing changed upstream, so the second pull does nothing.
//! assert!(!follower.pull(&overview.state(), &mut detail).unwrap());
//! ```

use kurbo::Vec2;

use crate::aspect::fix_window_position;
use crate::error::WorldError;
use crate::subset::Subset;
use crate::world::{World, WorldState};

/// What a follower copies from its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Copy the whole window.
    #[default]
    Window,
    /// Move the window center to the source's center, keeping the size.
    Center,
    /// Match the source's world units per pixel, keeping the center.
    Scale,
}

/// Applies `source` to `target` according to `mode`.
///
/// Returns `Ok(true)` if the target window changed.
pub fn follow(source: &WorldState, target: &mut World, mode: LinkMode) -> Result<bool, WorldError> {
    let window = match mode {
        LinkMode::Window => source.window,
        LinkMode::Center => {
            let current = target.window();
            if !target.has_window() {
                return Err(WorldError::Degenerate(current));
            }
            current.translate(source.window.center() - current.center())
        }
        LinkMode::Scale => scaled_window(source, target)?,
    };
    let before = target.window();
    let after = target.change_window(window)?;
    Ok(before != after)
}

fn scaled_window(source: &WorldState, target: &World) -> Result<Subset, WorldError> {
    if !source.viewport.is_realized() || !target.viewport().is_realized() {
        return Err(WorldError::ViewportNotRealized);
    }
    let src = source.viewport.to_vec2();
    let per_pixel = Vec2::new(
        (source.window.width() / src.x).abs(),
        (source.window.height() / src.y).abs(),
    );
    let dst = target.viewport().to_vec2();
    Ok(fix_window_position(
        target.window(),
        Vec2::new(per_pixel.x * dst.x, per_pixel.y * dst.y),
    ))
}

/// Remembers the last source snapshot it applied, so repeated pulls with no
/// upstream change are free.
///
/// Revisions are per world, so the whole snapshot is compared: a different
/// source that happens to share a revision number is still applied.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkFollower {
    mode: LinkMode,
    last: Option<WorldState>,
}

impl LinkFollower {
    /// Creates a follower with the given mode.
    #[must_use]
    pub fn new(mode: LinkMode) -> Self {
        Self {
            mode,
            last: None,
        }
    }

    /// Current link mode.
    #[must_use]
    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    /// Changes the mode; the next pull applies unconditionally.
    pub fn set_mode(&mut self, mode: LinkMode) {
        self.mode = mode;
        self.last = None;
    }

    /// Forgets the last applied snapshot; the next pull applies unconditionally.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Pulls `source` into `target` if the source changed since the last pull.
    pub fn pull(&mut self, source: &WorldState, target: &mut World) -> Result<bool, WorldError> {
        if self.last.as_ref() == Some(source) {
            return Ok(false);
        }
        let changed = follow(source, target, self.mode)?;
        self.last = Some(*source);
        Ok(changed)
    }
}
