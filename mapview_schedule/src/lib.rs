// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapview Schedule: debounced viewport and window updates.
//!
//! Resizing a window or dragging a scrollbar produces many events per second,
//! while recomputing a map view is expensive. This crate turns those bursts
//! into single commits:
//!
//! - [`Debouncer`]: a restartable one‑shot deadline with `Idle` and
//!   `Pending(deadline)` states, explicit cancellation, and optional
//!   backoff when the work has to wait.
//! - [`RenderFlag`]: the shared "render in progress" flag. Work that comes
//!   due during a render is rescheduled, never run underneath it.
//! - [`UpdateScheduler`]: one debouncer for resizes and one for scrolls,
//!   committing the latest viewport size and the summed scroll delta to a
//!   [`mapview_world::World`] in a single batch.
//!
//! The host supplies monotonic timestamps and polls
//! [`UpdateScheduler::tick`]; nothing here reads a clock or spawns a timer.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod debounce;
mod render;
mod scheduler;

pub use debounce::{DebounceState, Debouncer};
pub use render::{RenderFlag, RenderGuard};
pub use scheduler::{ScheduleConfig, ScheduleStats, TickReport, UpdateScheduler};
