// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapview Extent: policies that decide what a viewer shows.
//!
//! A viewer asks its [`ExtentPolicy`] to bring the world in line with the
//! current layers before each paint pass. Which layers count depends on the
//! display mode:
//!
//! - [`ExtentPolicy::ActiveRaster`]: imagery viewers, covering active rasters.
//! - [`ExtentPolicy::Gis`]: map viewers, covering every active layer.
//! - [`ExtentPolicy::Null`]: viewers whose extent is managed elsewhere (for
//!   example a 3D scene), so callers need no special case.
//!
//! Layers reach the policy through the [`Layer`] and [`LayerList`] traits;
//! reprojection into the world's spatial reference is the layer's job.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use mapview_extent::{ExtentOutcome, ExtentPolicy, Layer, LayerKind};
//! use mapview_world::{Subset, World};
//!
//! struct Scene(Subset);
//!
//! impl Layer for Scene {
//!     fn is_active(&self) -> bool { true }
//!     fn kind(&self) -> LayerKind { LayerKind::Raster }
//!     fn extent(&self, _srs: &str) -> Option<Subset> { Some(self.0) }
//! }
//!
//! let layers = Rc::new(vec![
//!     Scene(Subset::from_coords(0.0, 0.0, 10.0, 10.0)),
//!     Scene(Subset::from_coords(5.0, 5.0, 20.0, 20.0)),
//! ]);
//! let world = Rc::new(RefCell::new(World::new()));
//! let policy = ExtentPolicy::active_raster(layers, world.clone());
//!
//! let full = Subset::from_coords(0.0, 0.0, 20.0, 20.0);
//! assert_eq!(policy.set_extent().unwrap(), ExtentOutcome::Updated(full));
//! assert_eq!(policy.set_extent().unwrap(), ExtentOutcome::Unchanged);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod layer;
mod policy;

pub use layer::{Layer, LayerKind, LayerList};
pub use policy::{Binding, ExtentOutcome, ExtentPolicy};
