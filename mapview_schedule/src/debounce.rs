// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

/// State of a [`Debouncer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing scheduled.
    Idle,
    /// An action is due at `deadline`.
    Pending {
        /// Monotonic time at which the action becomes due.
        deadline: Duration,
    },
}

/// One‑shot deadline that restarts on every trigger.
///
/// Time is whatever monotonic clock the host uses, expressed as a
/// [`Duration`] since an arbitrary epoch. The debouncer never reads a clock
/// itself, so it works the same in tests, on the web, and without `std`.
///
/// ```
/// use core::time::Duration;
/// use mapview_schedule::Debouncer;
///
/// let ms = Duration::from_millis;
/// let mut resize = Debouncer::new(ms(250));
///
/// resize.trigger(ms(0));
/// resize.trigger(ms(100)); // restarts the quiet period
/// assert!(!resize.fire(ms(300)));
/// assert!(resize.fire(ms(350)));
/// assert!(!resize.is_pending());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    quiescence: Duration,
    max_backoff: Duration,
    deadline: Option<Duration>,
    deferrals: u32,
}

impl Debouncer {
    /// Creates a debouncer whose deferrals wait one quiet period each.
    #[must_use]
    pub fn new(quiescence: Duration) -> Self {
        Self::with_backoff(quiescence, quiescence)
    }

    /// Creates a debouncer whose consecutive deferrals double their wait,
    /// up to `max_backoff`.
    #[must_use]
    pub fn with_backoff(quiescence: Duration, max_backoff: Duration) -> Self {
        Self {
            quiescence,
            max_backoff: max_backoff.max(quiescence),
            deadline: None,
            deferrals: 0,
        }
    }

    /// Quiet period required before the action runs.
    #[must_use]
    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DebounceState {
        match self.deadline {
            Some(deadline) => DebounceState::Pending { deadline },
            None => DebounceState::Idle,
        }
    }

    /// Deadline of the pending action, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns `true` while an action is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consecutive deferrals since the last trigger.
    #[must_use]
    pub fn deferrals(&self) -> u32 {
        self.deferrals
    }

    /// (Re)starts the quiet period at `now`.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.quiescence));
        self.deferrals = 0;
    }

    /// Returns `true` if the action is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Consumes the pending action if it is due. Returns whether it was.
    pub fn fire(&mut self, now: Duration) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.deadline = None;
        self.deferrals = 0;
        true
    }

    /// Pushes a pending action back because it cannot run yet.
    ///
    /// Each consecutive deferral waits twice as long as the previous one,
    /// capped at the configured maximum backoff.
    pub fn defer(&mut self, now: Duration) {
        if self.deadline.is_none() {
            return;
        }
        let factor = 1_u32.checked_shl(self.deferrals).unwrap_or(u32::MAX);
        let wait = self.quiescence.saturating_mul(factor).min(self.max_backoff);
        self.deadline = Some(now.saturating_add(wait));
        self.deferrals = self.deferrals.saturating_add(1);
    }

    /// Drops the pending action. Returns `false` if nothing was scheduled.
    pub fn cancel(&mut self) -> bool {
        self.deferrals = 0;
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::{DebounceState, Debouncer};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn burst_of_triggers_fires_once_after_last() {
        let mut d = Debouncer::new(ms(250));
        for t in (0..200).step_by(10) {
            d.trigger(ms(t));
        }
        assert_eq!(d.state(), DebounceState::Pending { deadline: ms(440) });

        let fired = (0..1000)
            .step_by(5)
            .filter(|&t| d.fire(ms(t)))
            .count();
        assert_eq!(fired, 1);
        assert_eq!(d.state(), DebounceState::Idle);
    }

    #[test]
    fn fixed_deferral_waits_one_period() {
        let mut d = Debouncer::new(ms(250));
        d.trigger(ms(0));
        d.defer(ms(250));
        assert_eq!(d.deadline(), Some(ms(500)));
        d.defer(ms(500));
        assert_eq!(d.deadline(), Some(ms(750)));
        assert_eq!(d.deferrals(), 2);
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let mut d = Debouncer::with_backoff(ms(100), ms(350));
        d.trigger(ms(0));
        d.defer(ms(100));
        assert_eq!(d.deadline(), Some(ms(200)));
        d.defer(ms(200));
        assert_eq!(d.deadline(), Some(ms(400)));
        d.defer(ms(400));
        assert_eq!(d.deadline(), Some(ms(750)));

        // A fresh trigger resets the backoff.
        d.trigger(ms(800));
        assert_eq!(d.deferrals(), 0);
        assert_eq!(d.deadline(), Some(ms(900)));
    }

    #[test]
    fn defer_and_cancel_on_idle_are_no_ops() {
        let mut d = Debouncer::new(ms(10));
        d.defer(ms(5));
        assert!(!d.is_pending());
        assert!(!d.cancel());

        d.trigger(ms(0));
        assert!(d.cancel());
        assert!(!d.fire(ms(100)));
    }
}
