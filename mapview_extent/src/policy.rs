// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::RefCell;

use mapview_world::{Subset, World, WorldError};
use tracing::{debug, trace};

use crate::layer::{Layer, LayerKind, LayerList};

/// Shared handles a policy acts on. The policy owns neither the layers nor
/// the world; it is attached to one world at a time.
#[derive(Debug)]
pub struct Binding<L: ?Sized> {
    layers: Rc<L>,
    world: Rc<RefCell<World>>,
}

impl<L: ?Sized> Binding<L> {
    /// Binds `layers` to `world`.
    #[must_use]
    pub fn new(layers: Rc<L>, world: Rc<RefCell<World>>) -> Self {
        Self { layers, world }
    }
}

impl<L: ?Sized> Clone for Binding<L> {
    fn clone(&self) -> Self {
        Self {
            layers: Rc::clone(&self.layers),
            world: Rc::clone(&self.world),
        }
    }
}

/// What a call to [`ExtentPolicy::set_extent`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExtentOutcome {
    /// The policy does not manage any extent ([`ExtentPolicy::Null`]).
    Unmanaged,
    /// No qualifying layer had a usable extent; the world is untouched.
    NothingToShow,
    /// The world was already up to date.
    Unchanged,
    /// The world (and possibly the window) changed; carries the window.
    Updated(Subset),
    /// The world was already mutably borrowed, typically from inside a
    /// viewer callback. Nothing was changed; retry on the next pass.
    Busy,
}

/// Decides which window a viewer shows for its layers.
///
/// The set of strategies is closed:
/// - [`ExtentPolicy::ActiveRaster`] covers every active raster layer.
/// - [`ExtentPolicy::Gis`] covers every active layer, raster or vector.
/// - [`ExtentPolicy::Null`] leaves the extent to someone else.
///
/// Both covering policies set the world extent to the union of the layer
/// extents, reprojected into the world's spatial reference. The window is
/// reset to that union only when it differs from the current world extent
/// (the layer set changed) or no window exists yet, so a renderer may call
/// [`ExtentPolicy::set_extent`] before every paint without undoing the user's
/// zoom. Repeated calls without layer changes are no‑ops and do not notify.
#[derive(Debug)]
pub enum ExtentPolicy<L: ?Sized> {
    /// Union of active raster layers.
    ActiveRaster(Binding<L>),
    /// Union of all active layers.
    Gis(Binding<L>),
    /// No extent management.
    Null,
}

impl<L: LayerList + ?Sized> ExtentPolicy<L> {
    /// Policy covering the active raster layers of `layers`.
    #[must_use]
    pub fn active_raster(layers: Rc<L>, world: Rc<RefCell<World>>) -> Self {
        Self::ActiveRaster(Binding::new(layers, world))
    }

    /// Policy covering every active layer of `layers`.
    #[must_use]
    pub fn gis(layers: Rc<L>, world: Rc<RefCell<World>>) -> Self {
        Self::Gis(Binding::new(layers, world))
    }

    /// Policy that never touches any extent.
    #[must_use]
    pub fn null() -> Self {
        Self::Null
    }

    /// Layer list this policy reads, if any.
    #[must_use]
    pub fn layer_list(&self) -> Option<&Rc<L>> {
        self.binding().map(|b| &b.layers)
    }

    /// World this policy mutates, if any.
    #[must_use]
    pub fn coordinate_space(&self) -> Option<&Rc<RefCell<World>>> {
        self.binding().map(|b| &b.world)
    }

    /// Union of the qualifying layer extents in `target_srs`.
    #[must_use]
    pub fn union_extent(&self, target_srs: &str) -> Option<Subset> {
        let (binding, rasters_only) = match self {
            Self::ActiveRaster(b) => (b, true),
            Self::Gis(b) => (b, false),
            Self::Null => return None,
        };
        let mut union: Option<Subset> = None;
        binding.layers.visit_layers(&mut |layer: &dyn Layer| {
            if !layer.is_active() || (rasters_only && layer.kind() != LayerKind::Raster) {
                return;
            }
            let Some(extent) = layer.extent(target_srs) else {
                debug!(target_srs, "layer extent not available in target reference");
                return;
            };
            if extent.is_degenerate() {
                debug!(?extent, "skipping degenerate layer extent");
                return;
            }
            union = Some(match union {
                Some(acc) => acc.union(&extent),
                None => extent,
            });
        });
        union
    }

    /// Brings the bound world in line with the layers. See the type docs.
    pub fn set_extent(&self) -> Result<ExtentOutcome, WorldError> {
        self.apply(false)
    }

    /// Like [`ExtentPolicy::set_extent`], but always resets the window to the
    /// union ("fit to extent").
    pub fn fit(&self) -> Result<ExtentOutcome, WorldError> {
        self.apply(true)
    }

    fn apply(&self, force_window: bool) -> Result<ExtentOutcome, WorldError> {
        let Some(binding) = self.binding() else {
            return Ok(ExtentOutcome::Unmanaged);
        };
        let Ok(mut world) = binding.world.try_borrow_mut() else {
            debug!("world busy, extent update skipped");
            return Ok(ExtentOutcome::Busy);
        };
        let Some(union) = self.union_extent(world.spatial_reference()) else {
            return Ok(ExtentOutcome::NothingToShow);
        };

        let reset_window = force_window || !world.has_window() || world.world() != union;
        let mut batch = world.begin_batch();
        let mut changed = batch.set_world(union)?;
        if reset_window {
            changed |= batch.set_window(union)?;
        }
        let window = batch.window();
        batch.end();

        if changed {
            trace!(?union, ?window, "extent updated");
            Ok(ExtentOutcome::Updated(window))
        } else {
            Ok(ExtentOutcome::Unchanged)
        }
    }

    fn binding(&self) -> Option<&Binding<L>> {
        match self {
            Self::ActiveRaster(b) | Self::Gis(b) => Some(b),
            Self::Null => None,
        }
    }
}
