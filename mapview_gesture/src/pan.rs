// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use mapview_world::{Subset, World};
use tracing::{debug, trace};

use crate::track::PointerTrack;

/// Visual feedback for one pan move.
///
/// Hosts shift the already rendered image by these amounts instead of
/// recomputing the window on every pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanFeedback {
    /// Pointer movement since the previous event, in pixels.
    pub delta: Vec2,
    /// Pointer movement since the drag started, in pixels.
    pub total: Vec2,
    /// Whole‑pixel scrollbar steps equivalent to `delta`. Content follows the
    /// pointer, so the steps have the opposite sign; sub‑pixel remainders
    /// carry over to the next event.
    pub scroll: (i32, i32),
}

/// Result of ending a pan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanOutcome {
    /// The window moved; carries the new window.
    Panned(Subset),
    /// The pointer ended where it started.
    Unmoved,
    /// The translation could not be committed; the window is unchanged.
    Skipped,
    /// No pan was in progress.
    Ignored,
}

/// Drag‑to‑pan with cheap per‑move feedback and a single commit.
///
/// [`PanGesture::on_drag`] only reports pixel deltas. The authoritative
/// window change happens once, in [`PanGesture::on_end_drag`], from the net
/// world translation between the start and end pixels. Any number of moves
/// therefore costs one window recomputation.
#[derive(Clone, Debug, Default)]
pub struct PanGesture {
    track: PointerTrack,
    residual: Vec2,
}

impl PanGesture {
    /// Creates an idle pan gesture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` between [`PanGesture::on_begin_drag`] and the end.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.track.is_dragging()
    }

    /// Offset of the last recorded pointer from the drag start, in pixels.
    #[must_use]
    pub fn offset(&self) -> Option<Vec2> {
        self.track.total_offset(self.track.last_pos()?)
    }

    /// Starts panning at `pos`.
    pub fn on_begin_drag(&mut self, pos: Point) {
        self.track.start(pos);
        self.residual = Vec2::ZERO;
    }

    /// Records a move and returns the feedback for it. `None` when idle.
    pub fn on_drag(&mut self, pos: Point) -> Option<PanFeedback> {
        let delta = self.track.update(pos)?;
        let total = self.track.total_offset(pos)?;
        let wanted = self.residual - delta;
        let scroll = (whole_pixels(wanted.x), whole_pixels(wanted.y));
        self.residual = wanted - Vec2::new(f64::from(scroll.0), f64::from(scroll.1));
        Some(PanFeedback {
            delta,
            total,
            scroll,
        })
    }

    /// Ends the pan at `pos` and commits the net translation to `world`.
    pub fn on_end_drag(&mut self, pos: Point, world: &mut World) -> PanOutcome {
        let Some(start) = self.track.start_pos() else {
            return PanOutcome::Ignored;
        };
        self.cancel();
        if start == pos {
            return PanOutcome::Unmoved;
        }
        let (Some(from), Some(to)) = (
            world.viewport_to_window(start),
            world.viewport_to_window(pos),
        ) else {
            debug!("pan ended without a realized viewport");
            return PanOutcome::Skipped;
        };
        match world.translate_window(from - to) {
            Ok(window) => {
                trace!(?window, "pan committed");
                PanOutcome::Panned(window)
            }
            Err(err) => {
                debug!(%err, "pan commit refused");
                PanOutcome::Skipped
            }
        }
    }

    /// Abandons the pan without committing.
    pub fn cancel(&mut self) {
        self.track.end();
        self.residual = Vec2::ZERO;
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "per-event pointer deltas are far inside i32 range"
)]
fn whole_pixels(v: f64) -> i32 {
    v as i32
}
