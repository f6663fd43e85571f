// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapview Gesture: pointer gestures that change a map viewer's window.
//!
//! Two gestures are provided, both built so that continuous pointer input
//! never reaches the live [`mapview_world::World`] until the gesture ends:
//!
//! - [`ZoomGesture`]: rubber‑band zoom. Dragging computes an aspect‑corrected
//!   preview rectangle on values only; releasing the zoom‑in button shows the
//!   rectangle, releasing the zoom‑out button shows the current view inside
//!   it. Degenerate rectangles are skipped and the window is kept.
//! - [`PanGesture`]: drag‑to‑pan. Moves report pixel deltas and scrollbar
//!   steps for cheap visual feedback; the end commits one net translation.
//!
//! Both gestures cancel without side effects: [`ZoomGesture::reset`],
//! [`ZoomGesture::on_window_leave`] and [`PanGesture::cancel`].
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod button;
mod pan;
mod track;
mod zoom;

pub use button::{GestureConfig, PointerButton, ZoomAction};
pub use pan::{PanFeedback, PanGesture, PanOutcome};
pub use zoom::{GestureOutcome, GesturePhase, GestureState, ZoomGesture, preview_subset};
