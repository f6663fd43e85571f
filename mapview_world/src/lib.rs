// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapview World: the coordinate spaces behind a 2D geospatial viewer.
//!
//! A viewer draws part of a geographic extent into a pixel rectangle. This
//! crate keeps the three spaces involved consistent:
//! - **World**: the full extent of the loaded layers.
//! - **Window**: the visible sub‑rectangle, in world units.
//! - **Viewport**: the on‑screen pixel size.
//!
//! [`World`] owns that state, converts points between window and viewport
//! space, and notifies registered viewers after each committed change. With
//! [`AspectMode::Preserve`] it additionally grows the window after every
//! mutation so its aspect ratio matches the viewport (see [`aspect`]).
//!
//! It does **not** render, load layers, or interpret input. Extent policies,
//! gestures and update scheduling live in sibling crates built on this one.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use mapview_world::{Direction, Subset, World};
//!
//! let mut world = World::aspect_preserving();
//! world.set_world(Subset::from_coords(0.0, 0.0, 100.0, 100.0)).unwrap();
//! world.set_viewport(200, 100).unwrap();
//!
//! // A square window in a 2:1 viewport grows to 2:1 around its center.
//! world.set_window(Subset::from_coords(0.0, 0.0, 50.0, 50.0)).unwrap();
//! assert_eq!(world.window().width(), 100.0);
//! assert_eq!(world.window().center(), Point::new(25.0, 25.0));
//!
//! // Pixel → world for hit testing.
//! let hit = world.transform(Point::new(100.0, 50.0), Direction::Inverse);
//! assert_eq!(hit, Some(Point::new(25.0, 25.0)));
//! ```
//!
//! ## Viewers and batching
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use mapview_world::{Subset, World};
//!
//! let mut world = World::new();
//! let paints = Rc::new(Cell::new(0));
//! let counter = paints.clone();
//! world.register_viewer(move |_state, _changes| counter.set(counter.get() + 1));
//!
//! let mut batch = world.begin_batch();
//! batch.set_world(Subset::from_coords(0.0, 0.0, 10.0, 10.0)).unwrap();
//! batch.set_viewport(640, 480).unwrap();
//! batch.end();
//! assert_eq!(paints.get(), 1);
//! ```
//!
//! ## Failure model
//!
//! Degenerate windows, non‑finite coordinates and zero viewports are refused
//! with a [`WorldError`]. The previous state is kept and nothing is notified.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

pub mod aspect;
mod change;
mod error;
pub mod link;
mod modes;
mod subset;
mod world;

pub use change::{ChangeFlags, ViewerCallback, ViewerId};
pub use error::WorldError;
pub use modes::{AspectMode, Direction, Notify};
pub use subset::{Subset, ViewportSize};
pub use world::{Batch, World, WorldState};
