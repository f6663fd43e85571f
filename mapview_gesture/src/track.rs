// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Pointer positions of one drag, in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PointerTrack {
    span: Option<(Point, Point)>,
}

impl PointerTrack {
    /// Starts tracking at `pos`, discarding any previous drag.
    pub(crate) fn start(&mut self, pos: Point) {
        self.span = Some((pos, pos));
    }

    /// Records `pos` and returns the movement since the previous position.
    pub(crate) fn update(&mut self, pos: Point) -> Option<Vec2> {
        let (_, last) = self.span.as_mut()?;
        let delta = pos - *last;
        *last = pos;
        Some(delta)
    }

    /// Where the drag started.
    pub(crate) fn start_pos(&self) -> Option<Point> {
        self.span.map(|(start, _)| start)
    }

    /// Last recorded position.
    pub(crate) fn last_pos(&self) -> Option<Point> {
        self.span.map(|(_, last)| last)
    }

    /// Offset from the start to `pos`.
    pub(crate) fn total_offset(&self, pos: Point) -> Option<Vec2> {
        self.start_pos().map(|start| pos - start)
    }

    /// Stops tracking.
    pub(crate) fn end(&mut self) {
        self.span = None;
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.span.is_some()
    }
}
