// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::String;
use core::ops::{Deref, DerefMut};

use kurbo::{Affine, Point, Rect, Vec2};
use tracing::{debug, trace};

use crate::aspect::fix_window_size;
use crate::change::{ChangeFlags, Observers, ViewerId};
use crate::error::{WorldError, validate};
use crate::modes::{AspectMode, Direction, Notify};
use crate::subset::{Subset, ViewportSize};

/// Value snapshot of a [`World`]'s geometry.
///
/// Snapshots are what viewers receive on notification, and what gesture
/// previews and linked viewers compute against. They carry no observers and
/// can be copied freely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldState {
    /// Full addressable extent.
    pub world: Subset,
    /// Currently visible sub‑rectangle.
    pub window: Subset,
    /// On‑screen pixel size.
    pub viewport: ViewportSize,
    /// Aspect handling of the world the snapshot was taken from.
    pub aspect: AspectMode,
    /// Revision at the time of the snapshot.
    pub revision: u64,
}

impl WorldState {
    /// Window → viewport transform, or `None` when the viewport is not
    /// realized or the window is degenerate.
    ///
    /// `viewport = (world - window.ul) * (viewport_size / window_size)`, with
    /// signed window sizes so flipped axes map correctly.
    #[must_use]
    pub fn window_to_viewport_affine(&self) -> Option<Affine> {
        if !self.viewport.is_realized() || self.window.is_degenerate() {
            return None;
        }
        let size = self.viewport.to_vec2();
        let extent = self.window.extent();
        let affine = Affine::scale_non_uniform(size.x / extent.x, size.y / extent.y)
            * Affine::translate(-self.window.ul.to_vec2());
        affine.is_finite().then_some(affine)
    }

    /// Converts a window (world unit) point into viewport pixels.
    #[must_use]
    pub fn window_to_viewport(&self, pt: Point) -> Option<Point> {
        self.window_to_viewport_affine().map(|a| a * pt)
    }

    /// Converts a viewport pixel into window (world unit) coordinates.
    #[must_use]
    pub fn viewport_to_window(&self, pt: Point) -> Option<Point> {
        self.window_to_viewport_affine().map(|a| a.inverse() * pt)
    }

    /// Maps a pixel‑space subset into world units, corner by corner.
    ///
    /// The result keeps the orientation the window gives each axis.
    #[must_use]
    pub fn viewport_subset_to_window(&self, pixels: Subset) -> Option<Subset> {
        let inverse = self.window_to_viewport_affine()?.inverse();
        Some(Subset::new(inverse * pixels.ul, inverse * pixels.lr))
    }
}

/// A viewer's coordinate space: world extent, visible window and viewport.
///
/// `World` reconciles three spaces:
/// - the **world**, the full extent of the loaded layers,
/// - the **window**, the currently visible part of it, in world units,
/// - the **viewport**, the on‑screen pixel rectangle the window is drawn into.
///
/// Every committed mutation bumps [`World::revision`], rebuilds the cached
/// transforms, and synchronously invokes each registered viewer once, unless
/// the mutation is suppressed or happens inside a [`Batch`].
///
/// Degenerate or non‑finite subsets are refused with a [`WorldError`] and
/// leave the previous state in place.
///
/// Each viewer owns its own `World`. Keeping two viewers in step is explicit,
/// see [`crate::link`].
#[derive(Debug)]
pub struct World {
    world: Subset,
    window: Subset,
    requested: Subset,
    window_set: bool,
    viewport: ViewportSize,
    max_viewport: Option<ViewportSize>,
    spatial_reference: String,
    aspect: AspectMode,
    revision: u64,
    observers: Observers,
    batch_depth: u32,
    held: bool,
    pending: ChangeFlags,
    window_to_viewport: Option<Affine>,
    viewport_to_window: Option<Affine>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a world that stores windows verbatim.
    #[must_use]
    pub fn new() -> Self {
        Self::with_aspect(AspectMode::Free)
    }

    /// Creates a world that keeps the window aspect equal to the viewport's.
    #[must_use]
    pub fn aspect_preserving() -> Self {
        Self::with_aspect(AspectMode::Preserve)
    }

    /// Creates a world with the given aspect handling.
    #[must_use]
    pub fn with_aspect(aspect: AspectMode) -> Self {
        Self {
            world: Subset::ZERO,
            window: Subset::ZERO,
            requested: Subset::ZERO,
            window_set: false,
            viewport: ViewportSize::default(),
            max_viewport: None,
            spatial_reference: String::new(),
            aspect,
            revision: 0,
            observers: Observers::default(),
            batch_depth: 0,
            held: false,
            pending: ChangeFlags::empty(),
            window_to_viewport: None,
            viewport_to_window: None,
        }
    }

    /// Returns a detached copy of the geometry with no registered viewers.
    ///
    /// Mutating the copy never notifies anyone, which makes it suitable for
    /// previews that must not disturb the live world.
    #[must_use]
    pub fn scratch(&self) -> Self {
        let mut copy = Self::with_aspect(self.aspect);
        copy.world = self.world;
        copy.window = self.window;
        copy.requested = self.requested;
        copy.window_set = self.window_set;
        copy.viewport = self.viewport;
        copy.max_viewport = self.max_viewport;
        copy.spatial_reference.clone_from(&self.spatial_reference);
        copy.revision = self.revision;
        copy.rebuild_transforms();
        copy
    }

    /// Value snapshot of the current geometry.
    #[must_use]
    pub fn state(&self) -> WorldState {
        WorldState {
            world: self.world,
            window: self.window,
            viewport: self.viewport,
            aspect: self.aspect,
            revision: self.revision,
        }
    }

    /// Full addressable extent.
    #[must_use]
    pub fn world(&self) -> Subset {
        self.world
    }

    /// Currently visible window.
    #[must_use]
    pub fn window(&self) -> Subset {
        self.window
    }

    /// Window as last requested by a caller, before aspect correction.
    ///
    /// Viewport changes re-derive the visible window from this one, so
    /// earlier corrections never accumulate.
    #[must_use]
    pub fn requested_window(&self) -> Subset {
        self.requested
    }

    /// Returns `true` once a window has been committed.
    #[must_use]
    pub fn has_window(&self) -> bool {
        self.window_set
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Ceiling applied to requested viewport sizes, if any.
    #[must_use]
    pub fn max_viewport(&self) -> Option<ViewportSize> {
        self.max_viewport
    }

    /// Aspect handling chosen at construction.
    #[must_use]
    pub fn aspect(&self) -> AspectMode {
        self.aspect
    }

    /// Spatial reference that layer extents are expressed in.
    #[must_use]
    pub fn spatial_reference(&self) -> &str {
        &self.spatial_reference
    }

    /// Sets the spatial reference. Geometry is untouched and viewers are not
    /// notified; extent policies pick it up on their next run.
    pub fn set_spatial_reference(&mut self, srs: impl Into<String>) {
        self.spatial_reference = srs.into();
    }

    /// Counter bumped by every committed mutation, notified or not.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -------------------------------------------------------------------------
    // Viewers
    // -------------------------------------------------------------------------

    /// Registers a viewer callback, invoked once per committed mutation.
    pub fn register_viewer<F>(&mut self, callback: F) -> ViewerId
    where
        F: FnMut(&WorldState, ChangeFlags) + 'static,
    {
        self.observers.register(Box::new(callback))
    }

    /// Removes a viewer. Returns `false` if `id` was not registered.
    pub fn unregister_viewer(&mut self, id: ViewerId) -> bool {
        self.observers.unregister(id)
    }

    /// Number of registered viewers.
    #[must_use]
    pub fn viewer_count(&self) -> usize {
        self.observers.len()
    }

    /// Starts a batch: viewers are notified once, when the returned guard
    /// (and every enclosing guard) is dropped.
    ///
    /// ```
    /// use mapview_world::{Subset, World};
    ///
    /// let mut world = World::new();
    /// {
    ///     let mut batch = world.begin_batch();
    ///     batch.set_world(Subset::from_coords(0.0, 0.0, 100.0, 100.0)).unwrap();
    ///     batch.set_window(Subset::from_coords(10.0, 10.0, 20.0, 20.0)).unwrap();
    /// } // one notification here
    /// ```
    pub fn begin_batch(&mut self) -> Batch<'_> {
        self.batch_depth += 1;
        Batch { world: self }
    }

    /// Boolean form of [`World::begin_batch`] for callers that cannot hold a
    /// guard across their mutations.
    ///
    /// While held, committed mutations accumulate. Releasing with `false`
    /// delivers a single notification covering all of them, or leaves them to
    /// the enclosing [`Batch`] if one is open.
    pub fn prevent_next_viewer_update(&mut self, prevent: bool) {
        self.held = prevent;
        if !prevent && self.batch_depth == 0 {
            self.flush();
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Sets the full world extent.
    ///
    /// If no window has been committed yet, the window starts out as the
    /// whole world. Returns `Ok(false)` when `world` is already current.
    pub fn set_world(&mut self, world: Subset) -> Result<bool, WorldError> {
        let world = validate(world).inspect_err(|err| debug!(%err, "set_world rejected"))?;
        if self.world == world {
            return Ok(false);
        }
        self.world = world;
        let mut changes = ChangeFlags::WORLD;
        if !self.window_set {
            self.requested = world;
            self.window = self.fixed(world);
            self.window_set = true;
            changes |= ChangeFlags::WINDOW;
        }
        self.commit(changes, Notify::Viewers);
        Ok(true)
    }

    /// Sets the visible window and notifies viewers.
    ///
    /// The window is stored as given (no clamping to the world extent),
    /// after aspect correction when the world preserves aspect. Returns
    /// `Ok(false)` when the effective window is already current.
    pub fn set_window(&mut self, window: Subset) -> Result<bool, WorldError> {
        self.set_window_with(window, Notify::Viewers)
    }

    /// Sets the visible window, optionally without notifying viewers.
    pub fn set_window_with(&mut self, window: Subset, notify: Notify) -> Result<bool, WorldError> {
        let requested =
            validate(window).inspect_err(|err| debug!(%err, "set_window rejected"))?;
        let window = self.fixed(requested);
        self.requested = requested;
        if self.window_set && self.window == window {
            return Ok(false);
        }
        self.window = window;
        self.window_set = true;
        self.commit(ChangeFlags::WINDOW, notify);
        Ok(true)
    }

    /// Sets the viewport pixel size.
    ///
    /// The size is first clamped to [`World::max_viewport`]. A preserving
    /// world then re-derives its window from [`World::requested_window`], so
    /// a resize round trip restores the window it started from.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<bool, WorldError> {
        if width == 0 || height == 0 {
            debug!(width, height, "set_viewport rejected: not realized");
            return Err(WorldError::ZeroViewport { width, height });
        }
        let mut viewport = ViewportSize::new(width, height);
        if let Some(max) = self.max_viewport {
            viewport = viewport.clamp_to(max);
        }
        if self.viewport == viewport {
            return Ok(false);
        }
        self.viewport = viewport;
        let mut changes = ChangeFlags::VIEWPORT;
        if self.window_set {
            let fixed = self.fixed(self.requested);
            if fixed != self.window {
                self.window = fixed;
                changes |= ChangeFlags::WINDOW;
            }
        }
        self.commit(changes, Notify::Viewers);
        Ok(true)
    }

    /// Limits the viewport size accepted by [`World::set_viewport`].
    ///
    /// A current viewport larger than the new ceiling is shrunk to it.
    pub fn set_max_viewport(&mut self, width: u32, height: u32) -> Result<bool, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::ZeroViewport { width, height });
        }
        let max = ViewportSize::new(width, height);
        self.max_viewport = Some(max);
        if self.viewport.is_realized() {
            let clamped = self.viewport.clamp_to(max);
            return self.set_viewport(clamped.width, clamped.height);
        }
        Ok(false)
    }

    /// Authoritative window commit used by gestures and "fit" actions.
    ///
    /// Returns the effective window, which differs from `window` when aspect
    /// correction applied.
    pub fn change_window(&mut self, window: Subset) -> Result<Subset, WorldError> {
        if self.set_window(window)? {
            trace!(window = ?self.window, revision = self.revision, "window committed");
        }
        Ok(self.window)
    }

    /// Sets the window to the full world extent.
    pub fn fit_world(&mut self) -> Result<Subset, WorldError> {
        self.change_window(self.world)
    }

    /// Moves the window by `delta` world units.
    pub fn translate_window(&mut self, delta: Vec2) -> Result<Subset, WorldError> {
        self.change_window(self.requested.translate(delta))
    }

    /// Moves the window by `delta` pixels, the way a scrollbar would: a
    /// positive X scrolls toward higher pixel X.
    pub fn scroll_by_pixels(&mut self, delta: Vec2) -> Result<Subset, WorldError> {
        let origin = self
            .viewport_to_window(Point::ZERO)
            .ok_or(WorldError::ViewportNotRealized)?;
        let moved = self
            .viewport_to_window(delta.to_point())
            .ok_or(WorldError::ViewportNotRealized)?;
        self.translate_window(moved - origin)
    }

    /// Zooms in by `factor` about the pixel `(x, y)`.
    ///
    /// The world point under the pixel stays under it, so
    /// `zoom_in(x, y, f)` followed by `zoom_out(x, y, f)` restores the window.
    pub fn zoom_in(&mut self, x: f64, y: f64, factor: f64) -> Result<Subset, WorldError> {
        self.zoom_about(Point::new(x, y), factor)
    }

    /// Zooms out by `factor` about the pixel `(x, y)`.
    pub fn zoom_out(&mut self, x: f64, y: f64, factor: f64) -> Result<Subset, WorldError> {
        self.zoom_about(Point::new(x, y), 1.0 / factor)
    }

    /// Scales the window by `1 / factor` about a pixel anchor.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> Result<Subset, WorldError> {
        if !factor.is_finite() || factor <= 0.0 {
            debug!(factor, "zoom rejected: invalid factor");
            return Ok(self.window);
        }
        let anchor = self
            .viewport_to_window(anchor)
            .ok_or(WorldError::ViewportNotRealized)?;
        self.change_window(self.requested.scaled_about(anchor, 1.0 / factor))
    }

    // -------------------------------------------------------------------------
    // Transforms
    // -------------------------------------------------------------------------

    /// Converts `pt` between window and viewport space.
    ///
    /// Returns `None` until a non‑degenerate window and a realized viewport
    /// are both present.
    #[must_use]
    pub fn transform(&self, pt: Point, direction: Direction) -> Option<Point> {
        match direction {
            Direction::Forward => self.window_to_viewport(pt),
            Direction::Inverse => self.viewport_to_window(pt),
        }
    }

    /// Converts a world‑unit point into viewport pixels.
    #[must_use]
    pub fn window_to_viewport(&self, pt: Point) -> Option<Point> {
        self.window_to_viewport.map(|a| a * pt)
    }

    /// Converts a viewport pixel into world units.
    #[must_use]
    pub fn viewport_to_window(&self, pt: Point) -> Option<Point> {
        self.viewport_to_window.map(|a| a * pt)
    }

    /// World units covered by one pixel along each axis (unsigned).
    #[must_use]
    pub fn world_units_per_pixel(&self) -> Option<Vec2> {
        if !self.viewport.is_realized() || self.window.is_degenerate() {
            return None;
        }
        let size = self.viewport.to_vec2();
        Some(Vec2::new(
            (self.window.width() / size.x).abs(),
            (self.window.height() / size.y).abs(),
        ))
    }

    /// The window as a normalized rectangle, for culling.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        self.window.to_rect()
    }

    fn fixed(&self, window: Subset) -> Subset {
        match self.aspect {
            AspectMode::Free => window,
            AspectMode::Preserve => fix_window_size(window, self.viewport),
        }
    }

    fn commit(&mut self, changes: ChangeFlags, notify: Notify) {
        self.revision += 1;
        self.rebuild_transforms();
        if notify == Notify::Suppress {
            return;
        }
        self.pending |= changes;
        if self.batch_depth == 0 && !self.held {
            self.flush();
        }
    }

    fn flush(&mut self) {
        let changes = core::mem::take(&mut self.pending);
        if changes.is_empty() {
            return;
        }
        let state = self.state();
        self.observers.notify(&state, changes);
    }

    fn rebuild_transforms(&mut self) {
        self.window_to_viewport = self.state().window_to_viewport_affine();
        self.viewport_to_window = self.window_to_viewport.map(|a| a.inverse());
    }
}

/// Scope guard returned by [`World::begin_batch`].
///
/// Dereferences to the [`World`]; mutations made through it are delivered to
/// viewers as a single notification when the outermost guard ends.
#[derive(Debug)]
pub struct Batch<'a> {
    world: &'a mut World,
}

impl Batch<'_> {
    /// Ends the batch now. Equivalent to dropping the guard.
    pub fn end(self) {}
}

impl Deref for Batch<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

impl DerefMut for Batch<'_> {
    fn deref_mut(&mut self) -> &mut World {
        self.world
    }
}

impl Drop for Batch<'_> {
    fn drop(&mut self) {
        self.world.batch_depth -= 1;
        if self.world.batch_depth == 0 && !self.world.held {
            self.world.flush();
        }
    }
}
