// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use mapview_world::aspect::fix_window_size;
use mapview_world::{Subset, ViewportSize, World, WorldState};
use tracing::{debug, trace};

use crate::button::{GestureConfig, PointerButton, ZoomAction};
use crate::track::PointerTrack;

/// Phase of a [`ZoomGesture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// Between pointer down and pointer up.
    Dragging,
}

/// Snapshot of an in‑progress rubber‑band drag, in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    /// Pixel where the drag started.
    pub start_pixel: Point,
    /// Most recent pointer pixel.
    pub current_pixel: Point,
    /// Aspect‑corrected rubber band, or `None` while the drag is degenerate.
    pub preview: Option<Subset>,
}

/// Result of finishing a gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// The window was replaced by the dragged area; carries the new window.
    ZoomedIn(Subset),
    /// The window was enlarged around the dragged area; carries the new window.
    ZoomedOut(Subset),
    /// The drag produced no usable rectangle; the window is unchanged.
    Skipped,
    /// There was no drag to finish, or the button is not bound.
    Ignored,
}

/// Rubber‑band zoom: `Idle → Dragging → Idle`.
///
/// While dragging, the rubber band is corrected to the viewport's aspect
/// ratio on a value copy of the geometry; the live [`World`] is not touched,
/// so viewers are not repainted during the drag. Releasing commits exactly
/// one window change, or none when the dragged rectangle is degenerate.
///
/// ```
/// use kurbo::Point;
/// use mapview_gesture::{GestureOutcome, PointerButton, ZoomGesture};
/// use mapview_world::{Subset, World};
///
/// let mut world = World::aspect_preserving();
/// world.set_world(Subset::from_coords(0.0, 0.0, 200.0, 100.0)).unwrap();
/// world.set_viewport(200, 100).unwrap();
///
/// let mut zoom = ZoomGesture::default();
/// zoom.on_pointer_down(Point::new(50.0, 25.0), PointerButton::Primary);
/// zoom.on_pointer_move(Point::new(90.0, 45.0), &world.state());
/// let outcome =
///     zoom.on_pointer_up(Point::new(90.0, 45.0), PointerButton::Primary, &mut world);
///
/// let expected = Subset::from_coords(50.0, 25.0, 90.0, 45.0);
/// assert_eq!(outcome, GestureOutcome::ZoomedIn(expected));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoomGesture {
    config: GestureConfig,
    track: PointerTrack,
    preview: Option<Subset>,
}

impl ZoomGesture {
    /// Creates a gesture with custom button bindings.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            track: PointerTrack::default(),
            preview: None,
        }
    }

    /// Button bindings.
    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        if self.track.is_dragging() {
            GesturePhase::Dragging
        } else {
            GesturePhase::Idle
        }
    }

    /// Current rubber band in viewport pixels, if dragging and non‑degenerate.
    #[must_use]
    pub fn preview(&self) -> Option<Subset> {
        self.preview
    }

    /// Snapshot of the drag, or `None` when idle.
    #[must_use]
    pub fn state(&self) -> Option<GestureState> {
        Some(GestureState {
            start_pixel: self.track.start_pos()?,
            current_pixel: self.track.last_pos()?,
            preview: self.preview,
        })
    }

    /// Starts a drag at `pos`. Returns `false` for unbound buttons.
    ///
    /// A press while already dragging restarts the drag.
    pub fn on_pointer_down(&mut self, pos: Point, button: PointerButton) -> bool {
        if self.config.action_for(button).is_none() {
            return false;
        }
        self.track.start(pos);
        self.preview = None;
        true
    }

    /// Updates the rubber band and returns it. Does nothing when idle.
    pub fn on_pointer_move(&mut self, pos: Point, state: &WorldState) -> Option<Subset> {
        let start = self.track.start_pos()?;
        self.track.update(pos);
        self.preview = preview_subset(start, pos, state.viewport);
        trace!(preview = ?self.preview, "rubber band");
        self.preview
    }

    /// Finishes the drag and commits the zoom to `world`.
    ///
    /// Always returns the gesture to [`GesturePhase::Idle`].
    pub fn on_pointer_up(
        &mut self,
        pos: Point,
        button: PointerButton,
        world: &mut World,
    ) -> GestureOutcome {
        let Some(start) = self.track.start_pos() else {
            return GestureOutcome::Ignored;
        };
        self.reset();
        let Some(action) = self.config.action_for(button) else {
            return GestureOutcome::Ignored;
        };

        let state = world.state();
        let Some(band) = preview_subset(start, pos, state.viewport) else {
            debug!(?start, ?pos, "degenerate rubber band, zoom skipped");
            return GestureOutcome::Skipped;
        };
        let target = match action {
            ZoomAction::In => zoom_in_window(&state, band),
            ZoomAction::Out => zoom_out_window(&state, band),
        };
        let Some(target) = target.filter(|w| !w.is_degenerate()) else {
            debug!(?band, "zoom produced an invalid window, skipped");
            return GestureOutcome::Skipped;
        };
        match world.change_window(target) {
            Ok(window) => match action {
                ZoomAction::In => GestureOutcome::ZoomedIn(window),
                ZoomAction::Out => GestureOutcome::ZoomedOut(window),
            },
            Err(err) => {
                debug!(%err, "zoom commit refused");
                GestureOutcome::Skipped
            }
        }
    }

    /// The pointer left the viewer: cancel without committing.
    pub fn on_window_leave(&mut self) {
        self.reset();
    }

    /// Cancels any drag and clears the rubber band.
    pub fn reset(&mut self) {
        self.track.end();
        self.preview = None;
    }
}

/// Aspect‑corrected rubber band between two pixels.
///
/// The raw rectangle is grown to the viewport aspect ratio around its center,
/// the same correction a preserving [`World`] applies to windows. It is
/// computed on values only, so no live world observes it.
#[must_use]
pub fn preview_subset(start: Point, current: Point, viewport: ViewportSize) -> Option<Subset> {
    if !viewport.is_realized() {
        return None;
    }
    let raw = Subset::new(start, current).normalized();
    if raw.is_degenerate() {
        return None;
    }
    let band = fix_window_size(raw, viewport);
    (!band.is_degenerate()).then_some(band)
}

/// Window showing exactly the pixel rectangle `band`.
fn zoom_in_window(state: &WorldState, band: Subset) -> Option<Subset> {
    state.viewport_subset_to_window(band)
}

/// Window in which the current view would occupy `band`.
///
/// The window grows by the viewport/band ratio and is centered on the world
/// point under the band's center.
fn zoom_out_window(state: &WorldState, band: Subset) -> Option<Subset> {
    let center = state.viewport_to_window(band.center())?;
    let viewport = state.viewport.to_vec2();
    let kx = viewport.x / band.width();
    let ky = viewport.y / band.height();
    let window = Subset::from_center(
        center,
        state.window.width() * kx,
        state.window.height() * ky,
    );
    window.is_finite().then_some(window)
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use kurbo::Point;
    use mapview_world::{Subset, ViewportSize, World};

    use super::{GestureOutcome, GesturePhase, ZoomGesture, preview_subset};
    use crate::button::PointerButton;

    /// 200x100 viewport showing `[0,0]-[200,100]`: one world unit per pixel.
    fn world() -> (World, Rc<Cell<u32>>) {
        let mut world = World::aspect_preserving();
        world
            .set_world(Subset::from_coords(0.0, 0.0, 200.0, 100.0))
            .unwrap();
        world.set_viewport(200, 100).unwrap();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        world.register_viewer(move |_, _| seen.set(seen.get() + 1));
        (world, count)
    }

    #[test]
    fn preview_is_aspect_corrected_and_direction_independent() {
        let vp = ViewportSize::new(200, 100);
        let band = preview_subset(Point::new(60.0, 40.0), Point::new(40.0, 20.0), vp).unwrap();
        // 20x20 raw square grows to 40x20 around (50, 30).
        assert_eq!(band, Subset::from_coords(30.0, 20.0, 70.0, 40.0));
        assert_eq!(preview_subset(Point::new(5.0, 5.0), Point::new(5.0, 9.0), vp), None);
        assert_eq!(
            preview_subset(Point::ZERO, Point::new(1.0, 1.0), ViewportSize::default()),
            None
        );
    }

    #[test]
    fn moves_do_not_touch_the_live_world() {
        let (world, count) = world();
        let mut zoom = ZoomGesture::default();
        assert!(zoom.on_pointer_down(Point::new(10.0, 10.0), PointerButton::Primary));
        assert_eq!(zoom.phase(), GesturePhase::Dragging);

        for i in 1..=25 {
            let p = Point::new(10.0 + f64::from(i) * 4.0, 10.0 + f64::from(i));
            assert!(zoom.on_pointer_move(p, &world.state()).is_some());
        }

        assert_eq!(count.get(), 0);
        let state = zoom.state().unwrap();
        assert_eq!(state.start_pixel, Point::new(10.0, 10.0));
        assert_eq!(state.current_pixel, Point::new(110.0, 35.0));
        assert_eq!(state.preview, zoom.preview());
    }

    #[test]
    fn primary_release_zooms_in_to_band() {
        let (mut world, count) = world();
        let mut zoom = ZoomGesture::default();
        zoom.on_pointer_down(Point::new(50.0, 25.0), PointerButton::Primary);
        zoom.on_pointer_move(Point::new(70.0, 45.0), &world.state());

        let outcome =
            zoom.on_pointer_up(Point::new(70.0, 45.0), PointerButton::Primary, &mut world);

        // 20x20 band grows to 40x20 around (60, 35).
        let expected = Subset::from_coords(40.0, 25.0, 80.0, 45.0);
        assert_eq!(outcome, GestureOutcome::ZoomedIn(expected));
        assert_eq!(world.window(), expected);
        assert_eq!(count.get(), 1);
        assert_eq!(zoom.phase(), GesturePhase::Idle);
        assert_eq!(zoom.preview(), None);
    }

    #[test]
    fn secondary_release_zooms_out_around_band_center() {
        let (mut world, _) = world();
        let mut zoom = ZoomGesture::default();
        zoom.on_pointer_down(Point::new(50.0, 25.0), PointerButton::Secondary);

        let outcome =
            zoom.on_pointer_up(Point::new(150.0, 75.0), PointerButton::Secondary, &mut world);

        // The band is half the viewport, so the window doubles around (100, 50).
        let expected = Subset::from_coords(-100.0, -50.0, 300.0, 150.0);
        assert_eq!(outcome, GestureOutcome::ZoomedOut(expected));
    }

    #[test]
    fn zoom_in_preserves_flipped_world_orientation() {
        let mut world = World::aspect_preserving();
        world
            .set_world(Subset::from_coords(0.0, 100.0, 200.0, 0.0))
            .unwrap();
        world.set_viewport(200, 100).unwrap();

        let mut zoom = ZoomGesture::default();
        zoom.on_pointer_down(Point::new(0.0, 0.0), PointerButton::Primary);
        let outcome =
            zoom.on_pointer_up(Point::new(100.0, 50.0), PointerButton::Primary, &mut world);

        assert_eq!(
            outcome,
            GestureOutcome::ZoomedIn(Subset::from_coords(0.0, 100.0, 100.0, 50.0))
        );
        assert!(world.window().height() < 0.0);
    }

    #[test]
    fn degenerate_drag_keeps_previous_window() {
        let (mut world, count) = world();
        let before = world.window();
        let mut zoom = ZoomGesture::default();
        zoom.on_pointer_down(Point::new(10.0, 10.0), PointerButton::Primary);

        let outcome =
            zoom.on_pointer_up(Point::new(10.0, 60.0), PointerButton::Primary, &mut world);

        assert_eq!(outcome, GestureOutcome::Skipped);
        assert_eq!(world.window(), before);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn leaving_the_window_cancels() {
        let (mut world, count) = world();
        let mut zoom = ZoomGesture::default();
        zoom.on_pointer_down(Point::new(10.0, 10.0), PointerButton::Primary);
        zoom.on_pointer_move(Point::new(50.0, 50.0), &world.state());
        zoom.on_window_leave();

        assert_eq!(zoom.phase(), GesturePhase::Idle);
        assert_eq!(zoom.preview(), None);
        assert_eq!(
            zoom.on_pointer_up(Point::new(50.0, 50.0), PointerButton::Primary, &mut world),
            GestureOutcome::Ignored
        );
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn unbound_buttons_do_not_start_or_commit() {
        let (mut world, _) = world();
        let mut zoom = ZoomGesture::default();
        assert!(!zoom.on_pointer_down(Point::ZERO, PointerButton::Middle));
        assert_eq!(zoom.phase(), GesturePhase::Idle);

        zoom.on_pointer_down(Point::ZERO, PointerButton::Primary);
        assert_eq!(
            zoom.on_pointer_up(Point::new(40.0, 20.0), PointerButton::Other(7), &mut world),
            GestureOutcome::Ignored
        );
        assert_eq!(zoom.phase(), GesturePhase::Idle);
    }
}
