// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::world::WorldState;

bitflags::bitflags! {
    /// Which parts of a [`crate::World`] a committed mutation touched.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        /// The full world extent changed.
        const WORLD    = 0b0000_0001;
        /// The visible window changed.
        const WINDOW   = 0b0000_0010;
        /// The viewport size changed.
        const VIEWPORT = 0b0000_0100;
    }
}

/// Handle returned by [`crate::World::register_viewer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(u32);

/// Callback invoked after a committed mutation.
pub type ViewerCallback = Box<dyn FnMut(&WorldState, ChangeFlags)>;

const INLINE_VIEWERS: usize = 4;

/// Registered viewers, notified in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u32,
    entries: SmallVec<[(ViewerId, ViewerCallback); INLINE_VIEWERS]>,
}

impl Observers {
    pub(crate) fn register(&mut self, callback: ViewerCallback) -> ViewerId {
        let id = ViewerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn unregister(&mut self, id: ViewerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&mut self, state: &WorldState, changes: ChangeFlags) {
        for (_, callback) in &mut self.entries {
            callback(state, changes);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}
