// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::Cell;

/// Shared "a render pass is running" flag.
///
/// The renderer holds a [`RenderGuard`] for the duration of a pass; the
/// [`crate::UpdateScheduler`] checks the flag before committing and defers
/// instead of recomputing under a running render. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct RenderFlag {
    depth: Rc<Cell<u32>>,
}

impl RenderFlag {
    /// Creates a cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while any guard is alive.
    #[must_use]
    pub fn is_rendering(&self) -> bool {
        self.depth.get() > 0
    }

    /// Marks a render pass as running until the guard is dropped.
    #[must_use = "the render pass ends when the guard is dropped"]
    pub fn begin(&self) -> RenderGuard {
        self.depth.set(self.depth.get() + 1);
        RenderGuard { flag: self.clone() }
    }
}

/// Scope of one render pass, see [`RenderFlag::begin`].
#[derive(Debug)]
pub struct RenderGuard {
    flag: RenderFlag,
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        let depth = &self.flag.depth;
        depth.set(depth.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFlag;

    #[test]
    fn guards_nest_and_share_state() {
        let flag = RenderFlag::new();
        let seen_by_scheduler = flag.clone();
        assert!(!seen_by_scheduler.is_rendering());

        let outer = flag.begin();
        let inner = flag.begin();
        drop(inner);
        assert!(seen_by_scheduler.is_rendering());
        drop(outer);
        assert!(!seen_by_scheduler.is_rendering());
    }
}
