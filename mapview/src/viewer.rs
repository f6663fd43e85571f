// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::{RefCell, RefMut};
use core::time::Duration;

use kurbo::{Point, Vec2};
use mapview_extent::{ExtentOutcome, ExtentPolicy, LayerList};
use mapview_gesture::{
    GestureConfig, GestureOutcome, PanFeedback, PanGesture, PanOutcome, PointerButton, ZoomGesture,
};
use mapview_schedule::{RenderFlag, RenderGuard, ScheduleConfig, TickReport, UpdateScheduler};
use mapview_world::link::{LinkFollower, LinkMode};
use mapview_world::{AspectMode, Subset, World, WorldError, WorldState};
use tracing::debug;

/// How a viewer decides its extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Imagery: cover the active raster layers.
    #[default]
    Raster,
    /// Map: cover every active layer.
    Gis,
    /// Extent is managed by a 3D scene; no policy runs.
    ThreeD,
}

/// Which gesture a pointer drag drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    /// Rubber‑band zoom.
    #[default]
    Zoom,
    /// Drag to pan.
    Pan,
}

/// Construction options for a [`Viewer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ViewerConfig {
    /// Aspect handling of the viewer's world.
    pub aspect: AspectMode,
    /// Initial display mode.
    pub mode: DisplayMode,
    /// Debounce timing.
    pub schedule: ScheduleConfig,
    /// Zoom button bindings.
    pub gesture: GestureConfig,
}

/// Errors surfaced by [`Viewer`] operations.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ViewerError {
    /// The world is borrowed elsewhere, typically by a callback that reached
    /// back into the viewer. Nothing was changed.
    #[error("world is already borrowed")]
    Busy,
    /// The world refused the change.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Feedback for a pointer move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerFeedback {
    /// No gesture in progress.
    None,
    /// Rubber band to draw, in viewport pixels (`None` while degenerate).
    RubberBand(Option<Subset>),
    /// Offset the cached image for a pan.
    Pan(PanFeedback),
}

/// Result of a pointer release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerOutcome {
    /// A zoom gesture finished.
    Zoom(GestureOutcome),
    /// A pan gesture finished.
    Pan(PanOutcome),
}

/// One render pass, from [`Viewer::begin_paint`] until dropped.
///
/// While a pass is alive the shared render flag is set, so debounced updates
/// wait for it instead of changing the window under the renderer.
#[derive(Debug)]
pub struct PaintPass {
    /// Geometry to draw.
    pub state: WorldState,
    /// What the extent policy did before this pass.
    pub extent: ExtentOutcome,
    _guard: RenderGuard,
}

/// A viewer: one world, its extent policy, gestures and update scheduling.
///
/// Each viewer owns its world. Viewers showing the same layer list share the
/// list, never the world.
#[derive(Debug)]
pub struct Viewer<L: LayerList + ?Sized> {
    world: Rc<RefCell<World>>,
    layers: Rc<L>,
    mode: DisplayMode,
    policy: ExtentPolicy<L>,
    tool: Tool,
    zoom: ZoomGesture,
    pan: PanGesture,
    scheduler: UpdateScheduler,
    render: RenderFlag,
    link: Option<LinkFollower>,
}

impl<L: LayerList + ?Sized> Viewer<L> {
    /// Creates a viewer over `layers`.
    #[must_use]
    pub fn new(layers: Rc<L>, config: ViewerConfig) -> Self {
        let world = Rc::new(RefCell::new(World::with_aspect(config.aspect)));
        let render = RenderFlag::new();
        let policy = policy_for(config.mode, &layers, &world);
        Self {
            world,
            layers,
            mode: config.mode,
            policy,
            tool: Tool::default(),
            zoom: ZoomGesture::new(config.gesture),
            pan: PanGesture::new(),
            scheduler: UpdateScheduler::new(config.schedule, render.clone()),
            render,
            link: None,
        }
    }

    /// The viewer's world.
    #[must_use]
    pub fn world(&self) -> &Rc<RefCell<World>> {
        &self.world
    }

    /// Snapshot of the viewer's geometry.
    pub fn state(&self) -> Result<WorldState, ViewerError> {
        let world = self.world.try_borrow().map_err(|_| ViewerError::Busy)?;
        Ok(world.state())
    }

    /// Layers shown by this viewer.
    #[must_use]
    pub fn layers(&self) -> &Rc<L> {
        &self.layers
    }

    /// Current extent policy.
    #[must_use]
    pub fn policy(&self) -> &ExtentPolicy<L> {
        &self.policy
    }

    /// Current display mode.
    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switches display mode, replacing the extent policy.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.policy = policy_for(mode, &self.layers, &self.world);
    }

    /// Active drag tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Selects the drag tool, cancelling any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel_gestures();
        self.tool = tool;
    }

    /// Rubber‑band zoom state.
    #[must_use]
    pub fn zoom_gesture(&self) -> &ZoomGesture {
        &self.zoom
    }

    /// Update scheduler state.
    #[must_use]
    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// Shared render flag.
    #[must_use]
    pub fn render_flag(&self) -> &RenderFlag {
        &self.render
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Starts a render pass: runs the extent policy, then snapshots the world.
    pub fn begin_paint(&self) -> Result<PaintPass, ViewerError> {
        let guard = self.render.begin();
        let extent = self.policy.set_extent()?;
        Ok(PaintPass {
            state: self.state()?,
            extent,
            _guard: guard,
        })
    }

    // -------------------------------------------------------------------------
    // Pointer input
    // -------------------------------------------------------------------------

    /// Pointer pressed at `pos`.
    ///
    /// Buttons not bound in [`GestureConfig`] for the active tool are ignored.
    pub fn on_pointer_down(&mut self, pos: Point, button: PointerButton) {
        match self.tool {
            Tool::Zoom => {
                self.zoom.on_pointer_down(pos, button);
            }
            Tool::Pan if self.zoom.config().pans_with(button) => self.pan.on_begin_drag(pos),
            Tool::Pan => {}
        }
    }

    /// Pointer moved to `pos`.
    pub fn on_pointer_move(&mut self, pos: Point) -> PointerFeedback {
        match self.tool {
            Tool::Zoom => {
                let Ok(state) = self.state() else {
                    return PointerFeedback::None;
                };
                if self.zoom.state().is_none() {
                    return PointerFeedback::None;
                }
                PointerFeedback::RubberBand(self.zoom.on_pointer_move(pos, &state))
            }
            Tool::Pan => self
                .pan
                .on_drag(pos)
                .map_or(PointerFeedback::None, PointerFeedback::Pan),
        }
    }

    /// Pointer released at `pos`; commits the gesture.
    ///
    /// Releasing a button other than the pan button leaves a pan running.
    pub fn on_pointer_up(
        &mut self,
        pos: Point,
        button: PointerButton,
    ) -> Result<PointerOutcome, ViewerError> {
        if self.tool == Tool::Pan && !self.zoom.config().pans_with(button) {
            return Ok(PointerOutcome::Pan(PanOutcome::Ignored));
        }
        let mut world = borrow_world(&self.world)?;
        Ok(match self.tool {
            Tool::Zoom => PointerOutcome::Zoom(self.zoom.on_pointer_up(pos, button, &mut world)),
            Tool::Pan => PointerOutcome::Pan(self.pan.on_end_drag(pos, &mut world)),
        })
    }

    /// Pointer left the viewer: cancels any gesture.
    pub fn on_pointer_leave(&mut self) {
        self.cancel_gestures();
    }

    fn cancel_gestures(&mut self) {
        self.zoom.on_window_leave();
        self.pan.cancel();
    }

    // -------------------------------------------------------------------------
    // Resize, scroll and timers
    // -------------------------------------------------------------------------

    /// The surface was resized; applied after the quiet period.
    pub fn on_resize(&mut self, now: Duration, width: u32, height: u32) {
        self.scheduler.on_resize(now, width, height);
    }

    /// Scroll by `delta` world units; applied after the quiet period.
    pub fn on_scroll(&mut self, now: Duration, delta: Vec2) {
        self.scheduler.on_scroll(now, delta);
    }

    /// Runs due debounced work.
    pub fn tick(&mut self, now: Duration) -> Result<TickReport, ViewerError> {
        let mut world = borrow_world(&self.world)?;
        Ok(self.scheduler.tick(now, &mut world))
    }

    /// When the host loop should call [`Viewer::tick`] next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    // -------------------------------------------------------------------------
    // Toolbar actions
    // -------------------------------------------------------------------------

    /// Zooms in by `factor` about pixel `(x, y)`.
    pub fn zoom_in(&self, x: f64, y: f64, factor: f64) -> Result<Subset, ViewerError> {
        Ok(borrow_world(&self.world)?.zoom_in(x, y, factor)?)
    }

    /// Zooms out by `factor` about pixel `(x, y)`.
    pub fn zoom_out(&self, x: f64, y: f64, factor: f64) -> Result<Subset, ViewerError> {
        Ok(borrow_world(&self.world)?.zoom_out(x, y, factor)?)
    }

    /// Resets the window to the extent of the layers.
    ///
    /// Falls back to the world extent when the policy manages nothing.
    pub fn fit_to_extent(&self) -> Result<Subset, ViewerError> {
        match self.policy.fit()? {
            ExtentOutcome::Updated(window) => Ok(window),
            ExtentOutcome::Busy => Err(ViewerError::Busy),
            ExtentOutcome::Unmanaged | ExtentOutcome::NothingToShow | ExtentOutcome::Unchanged => {
                Ok(borrow_world(&self.world)?.fit_world()?)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Linking
    // -------------------------------------------------------------------------

    /// Follows another viewer in `mode`, or stops following with `None`.
    pub fn set_link(&mut self, mode: Option<LinkMode>) {
        self.link = mode.map(LinkFollower::new);
    }

    /// Pulls `source` into this viewer if linked and the source changed.
    ///
    /// Returns `Ok(true)` if the window changed.
    pub fn pull_link(&mut self, source: &WorldState) -> Result<bool, ViewerError> {
        let Some(link) = self.link.as_mut() else {
            return Ok(false);
        };
        let mut world = borrow_world(&self.world)?;
        Ok(link.pull(source, &mut world)?)
    }
}

fn policy_for<L: LayerList + ?Sized>(
    mode: DisplayMode,
    layers: &Rc<L>,
    world: &Rc<RefCell<World>>,
) -> ExtentPolicy<L> {
    match mode {
        DisplayMode::Raster => ExtentPolicy::active_raster(Rc::clone(layers), Rc::clone(world)),
        DisplayMode::Gis => ExtentPolicy::gis(Rc::clone(layers), Rc::clone(world)),
        DisplayMode::ThreeD => ExtentPolicy::null(),
    }
}

fn borrow_world(world: &Rc<RefCell<World>>) -> Result<RefMut<'_, World>, ViewerError> {
    world.try_borrow_mut().map_err(|_| {
        debug!("viewer world busy");
        ViewerError::Busy
    })
}
