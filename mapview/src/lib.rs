// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapview: the viewport engine of an interactive 2D geospatial viewer.
//!
//! This crate ties the Mapview building blocks together into a [`Viewer`]:
//!
//! - [`world`]: the coordinate space (world extent, visible window, pixel
//!   viewport) with aspect preservation and change notification.
//! - [`extent`]: policies deciding which layers the viewer should cover.
//! - [`gesture`]: rubber‑band zoom and drag‑to‑pan.
//! - [`schedule`]: debounced resize and scroll handling that yields to a
//!   running render.
//!
//! A host drives a viewer from its event loop: forward pointer, resize and
//! scroll events, call [`Viewer::tick`] by [`Viewer::next_deadline`], and wrap
//! each render in [`Viewer::begin_paint`]. Time is passed in by the host as a
//! [`core::time::Duration`] since any fixed origin.
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use mapview::extent::{Layer, LayerKind};
//! use mapview::world::{AspectMode, Subset};
//! use mapview::{Viewer, ViewerConfig};
//!
//! struct Image(Subset);
//!
//! impl Layer for Image {
//!     fn is_active(&self) -> bool { true }
//!     fn kind(&self) -> LayerKind { LayerKind::Raster }
//!     fn extent(&self, _srs: &str) -> Option<Subset> { Some(self.0) }
//! }
//!
//! let layers = Rc::new(vec![Image(Subset::from_coords(0.0, 0.0, 100.0, 100.0))]);
//! let config = ViewerConfig { aspect: AspectMode::Preserve, ..Default::default() };
//! let mut viewer = Viewer::new(layers, config);
//!
//! viewer.on_resize(Duration::ZERO, 200, 100);
//! viewer.tick(Duration::from_millis(300)).unwrap();
//!
//! let pass = viewer.begin_paint().unwrap();
//! assert_eq!(pass.state.window, Subset::from_coords(-50.0, 0.0, 150.0, 100.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` in the dependencies.
//! - `libm`: floating point support for `no_std` builds.
//! - `serde`: serialization of subsets, aspect modes and scheduler timing.

#![no_std]

extern crate alloc;

mod viewer;

pub use mapview_extent as extent;
pub use mapview_gesture as gesture;
pub use mapview_schedule as schedule;
pub use mapview_world as world;

pub use viewer::{
    DisplayMode, PaintPass, PointerFeedback, PointerOutcome, Tool, Viewer, ViewerConfig,
    ViewerError,
};
