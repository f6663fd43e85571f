// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use kurbo::Vec2;
use mapview_world::{ViewportSize, World};
use tracing::{debug, trace};

use crate::debounce::Debouncer;
use crate::render::RenderFlag;

/// Timing for an [`UpdateScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleConfig {
    /// Quiet period after the last resize before the viewport is applied.
    pub resize_quiescence: Duration,
    /// Quiet period after the last scroll before the window is moved.
    pub scroll_quiescence: Duration,
    /// Longest wait between retries while a render is running. Equal to the
    /// quiescence by default, which retries at a fixed interval.
    pub max_backoff: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            resize_quiescence: Duration::from_millis(250),
            scroll_quiescence: Duration::from_millis(250),
            max_backoff: Duration::from_millis(250),
        }
    }
}

/// What one [`UpdateScheduler::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The pending viewport size was committed.
    pub resized: bool,
    /// The accumulated scroll was committed.
    pub scrolled: bool,
    /// Due work was pushed back because a render is running.
    pub deferred: bool,
}

impl TickReport {
    /// Returns `true` if the world was changed.
    #[must_use]
    pub fn committed(&self) -> bool {
        self.resized || self.scrolled
    }
}

/// Counters since the scheduler was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    /// Resize events received.
    pub resize_events: u64,
    /// Scroll events received.
    pub scroll_events: u64,
    /// Viewport recomputations committed.
    pub viewport_commits: u64,
    /// Scroll translations committed.
    pub scroll_commits: u64,
    /// Times due work was pushed back by a running render.
    pub deferrals: u64,
}

/// Coalesces bursts of resize and scroll input into single commits.
///
/// Resizes and scrolls each have their own [`Debouncer`]. Every event
/// restarts its quiet period and only the latest viewport size (or the sum of
/// scroll deltas) is kept. The host calls [`UpdateScheduler::tick`] from its
/// main loop, at the latest by [`UpdateScheduler::next_deadline`]; due work is
/// committed to the [`World`] then, inside one batch, unless the shared
/// [`RenderFlag`] says a render is running, in which case the work is
/// rescheduled rather than racing the render.
///
/// ```
/// use core::time::Duration;
/// use mapview_schedule::UpdateScheduler;
/// use mapview_world::{Subset, World};
///
/// let ms = Duration::from_millis;
/// let mut world = World::new();
/// world.set_world(Subset::from_coords(0.0, 0.0, 100.0, 100.0)).unwrap();
///
/// let mut scheduler = UpdateScheduler::default();
/// for (i, width) in (600..700).step_by(10).enumerate() {
///     scheduler.on_resize(ms(i as u64 * 16), width, 400);
/// }
/// assert!(!scheduler.tick(ms(200), &mut world).resized);
/// assert!(scheduler.tick(ms(400), &mut world).resized);
/// assert_eq!(world.viewport().width, 690);
/// ```
#[derive(Clone, Debug)]
pub struct UpdateScheduler {
    rendering: RenderFlag,
    resize: Debouncer,
    scroll: Debouncer,
    pending_viewport: Option<ViewportSize>,
    pending_scroll: Vec2,
    stats: ScheduleStats,
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new(ScheduleConfig::default(), RenderFlag::new())
    }
}

impl UpdateScheduler {
    /// Creates a scheduler sharing `rendering` with the renderer.
    #[must_use]
    pub fn new(config: ScheduleConfig, rendering: RenderFlag) -> Self {
        Self {
            rendering,
            resize: Debouncer::with_backoff(config.resize_quiescence, config.max_backoff),
            scroll: Debouncer::with_backoff(config.scroll_quiescence, config.max_backoff),
            pending_viewport: None,
            pending_scroll: Vec2::ZERO,
            stats: ScheduleStats::default(),
        }
    }

    /// The render flag consulted before committing.
    #[must_use]
    pub fn render_flag(&self) -> &RenderFlag {
        &self.rendering
    }

    /// Resize debouncer state.
    #[must_use]
    pub fn resize(&self) -> &Debouncer {
        &self.resize
    }

    /// Scroll debouncer state.
    #[must_use]
    pub fn scroll(&self) -> &Debouncer {
        &self.scroll
    }

    /// Viewport size waiting to be applied.
    #[must_use]
    pub fn pending_viewport(&self) -> Option<ViewportSize> {
        self.pending_viewport
    }

    /// Scroll translation waiting to be applied, in world units.
    #[must_use]
    pub fn pending_scroll(&self) -> Vec2 {
        self.pending_scroll
    }

    /// Event and commit counters.
    #[must_use]
    pub fn stats(&self) -> ScheduleStats {
        self.stats
    }

    /// Records a resize; only the most recent size is applied.
    pub fn on_resize(&mut self, now: Duration, width: u32, height: u32) {
        self.pending_viewport = Some(ViewportSize::new(width, height));
        self.resize.trigger(now);
        self.stats.resize_events += 1;
    }

    /// Records a scroll of `delta` world units; deltas accumulate.
    pub fn on_scroll(&mut self, now: Duration, delta: Vec2) {
        self.pending_scroll += delta;
        self.scroll.trigger(now);
        self.stats.scroll_events += 1;
    }

    /// Earliest time at which [`UpdateScheduler::tick`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.resize.deadline(), self.scroll.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Returns `true` while either debouncer has work scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.resize.is_pending() || self.scroll.is_pending()
    }

    /// Drops all pending work. Returns `false` if nothing was pending.
    pub fn cancel(&mut self) -> bool {
        let resize = self.resize.cancel();
        let scroll = self.scroll.cancel();
        self.pending_viewport = None;
        self.pending_scroll = Vec2::ZERO;
        resize || scroll
    }

    /// Runs whatever is due at `now`.
    pub fn tick(&mut self, now: Duration, world: &mut World) -> TickReport {
        let mut report = TickReport::default();
        let resize_due = self.resize.is_due(now);
        let scroll_due = self.scroll.is_due(now);
        if !resize_due && !scroll_due {
            return report;
        }

        if self.rendering.is_rendering() {
            if resize_due {
                self.resize.defer(now);
            }
            if scroll_due {
                self.scroll.defer(now);
            }
            self.stats.deferrals += 1;
            trace!(next = ?self.next_deadline(), "render in progress, update deferred");
            report.deferred = true;
            return report;
        }

        let mut batch = world.begin_batch();
        if self.resize.fire(now) {
            if let Some(size) = self.pending_viewport.take() {
                match batch.set_viewport(size.width, size.height) {
                    Ok(true) => {
                        self.stats.viewport_commits += 1;
                        report.resized = true;
                    }
                    Ok(false) => trace!(?size, "debounced resize matches current viewport"),
                    Err(err) => debug!(%err, "debounced resize dropped"),
                }
            }
        }
        if self.scroll.fire(now) {
            let delta = core::mem::replace(&mut self.pending_scroll, Vec2::ZERO);
            if delta != Vec2::ZERO {
                match batch.translate_window(delta) {
                    Ok(_) => {
                        self.stats.scroll_commits += 1;
                        report.scrolled = true;
                    }
                    Err(err) => debug!(%err, "debounced scroll dropped"),
                }
            }
        }
        batch.end();
        report
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;
    use core::time::Duration;

    use kurbo::Vec2;
    use mapview_world::{Subset, ViewportSize, World};

    use super::{ScheduleConfig, TickReport, UpdateScheduler};
    use crate::render::RenderFlag;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn world() -> (World, Rc<Cell<u32>>) {
        let mut world = World::aspect_preserving();
        world
            .set_world(Subset::from_coords(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        world.set_viewport(100, 100).unwrap();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        world.register_viewer(move |_, _| seen.set(seen.get() + 1));
        (world, count)
    }

    #[test]
    fn resize_burst_recomputes_once() {
        let (mut world, count) = world();
        let mut scheduler = UpdateScheduler::default();

        for i in 0..40_u32 {
            scheduler.on_resize(ms(u64::from(i) * 5), 300 + i, 200);
            assert!(!scheduler.tick(ms(u64::from(i) * 5), &mut world).committed());
        }
        for t in (200..2000).step_by(16) {
            scheduler.tick(ms(t), &mut world);
        }

        assert_eq!(scheduler.stats().viewport_commits, 1);
        assert_eq!(scheduler.stats().resize_events, 40);
        assert_eq!(count.get(), 1);
        assert_eq!(world.viewport(), ViewportSize::new(339, 200));
    }

    #[test]
    fn running_render_defers_until_it_ends() {
        let (mut world, count) = world();
        let flag = RenderFlag::new();
        let mut scheduler = UpdateScheduler::new(ScheduleConfig::default(), flag.clone());
        scheduler.on_resize(ms(0), 640, 480);

        let guard = flag.begin();
        let report = scheduler.tick(ms(250), &mut world);
        assert_eq!(
            report,
            TickReport {
                deferred: true,
                ..TickReport::default()
            }
        );
        assert_eq!(scheduler.next_deadline(), Some(ms(500)));
        assert_eq!(count.get(), 0);

        drop(guard);
        assert!(!scheduler.tick(ms(499), &mut world).committed());
        assert!(scheduler.tick(ms(500), &mut world).resized);
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.stats().deferrals, 1);
    }

    #[test]
    fn scrolls_accumulate_into_one_translation() {
        let (mut world, count) = world();
        let mut scheduler = UpdateScheduler::default();
        for i in 0..10_u64 {
            scheduler.on_scroll(ms(i * 10), Vec2::new(1.0, -0.5));
        }
        assert_eq!(scheduler.pending_scroll(), Vec2::new(10.0, -5.0));

        let report = scheduler.tick(ms(400), &mut world);

        assert!(report.scrolled);
        assert_eq!(count.get(), 1);
        assert_eq!(
            world.window(),
            Subset::from_coords(10.0, -5.0, 110.0, 95.0)
        );
        assert_eq!(scheduler.pending_scroll(), Vec2::ZERO);
    }

    #[test]
    fn resize_and_scroll_due_together_notify_once() {
        let (mut world, count) = world();
        let mut scheduler = UpdateScheduler::default();
        scheduler.on_resize(ms(0), 200, 100);
        scheduler.on_scroll(ms(10), Vec2::new(5.0, 0.0));

        let report = scheduler.tick(ms(300), &mut world);

        assert!(report.resized && report.scrolled);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn independent_timers_fire_separately() {
        let (mut world, _) = world();
        let config = ScheduleConfig {
            scroll_quiescence: ms(50),
            ..ScheduleConfig::default()
        };
        let mut scheduler = UpdateScheduler::new(config, RenderFlag::new());
        scheduler.on_resize(ms(0), 120, 80);
        scheduler.on_scroll(ms(0), Vec2::new(1.0, 1.0));
        assert_eq!(scheduler.next_deadline(), Some(ms(50)));

        let first = scheduler.tick(ms(60), &mut world);
        assert!(first.scrolled && !first.resized);
        assert_eq!(scheduler.next_deadline(), Some(ms(250)));

        let second = scheduler.tick(ms(250), &mut world);
        assert!(second.resized && !second.scrolled);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn cancel_discards_pending_work() {
        let (mut world, count) = world();
        let mut scheduler = UpdateScheduler::default();
        scheduler.on_resize(ms(0), 10, 10);
        scheduler.on_scroll(ms(0), Vec2::new(3.0, 3.0));

        assert!(scheduler.cancel());
        assert_eq!(scheduler.tick(ms(1000), &mut world), TickReport::default());
        assert_eq!(count.get(), 0);
        assert!(!scheduler.cancel());
    }

    #[test]
    fn resize_back_to_current_size_commits_nothing() {
        let (mut world, count) = world();
        let revision = world.revision();
        let mut scheduler = UpdateScheduler::default();
        scheduler.on_resize(ms(0), 180, 90);
        scheduler.on_resize(ms(20), 100, 100);

        let report = scheduler.tick(ms(300), &mut world);

        assert!(!report.resized);
        assert!(!report.committed());
        assert_eq!(scheduler.stats().viewport_commits, 0);
        assert_eq!(world.revision(), revision);
        assert_eq!(count.get(), 0);
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn invalid_pending_viewport_is_dropped_quietly() {
        let (mut world, count) = world();
        let mut scheduler = UpdateScheduler::default();
        scheduler.on_resize(ms(0), 0, 480);

        let report = scheduler.tick(ms(300), &mut world);

        assert!(!report.resized);
        assert_eq!(count.get(), 0);
        assert!(!scheduler.is_pending());
    }
}
