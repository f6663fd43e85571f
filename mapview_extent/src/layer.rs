// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::cell::RefCell;

use mapview_world::Subset;

/// Broad category of a layer, used to pick which layers a policy considers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Gridded imagery.
    Raster,
    /// Features, annotations and other vector content.
    Vector,
}

/// A displayable layer as seen by an extent policy.
pub trait Layer {
    /// Whether the layer is currently shown.
    fn is_active(&self) -> bool;

    /// Raster or vector.
    fn kind(&self) -> LayerKind;

    /// Extent of the layer expressed in `target_srs`.
    ///
    /// Returns `None` when the layer cannot be reprojected into that
    /// reference; such layers are left out of the union.
    fn extent(&self, target_srs: &str) -> Option<Subset>;
}

/// An enumerable collection of layers.
///
/// Visiting rather than iterating lets implementations hand out layers from
/// behind a `RefCell` or a lock.
pub trait LayerList {
    /// Calls `visit` once per layer, in display order.
    fn visit_layers(&self, visit: &mut dyn FnMut(&dyn Layer));
}

impl<T: Layer> LayerList for [T] {
    fn visit_layers(&self, visit: &mut dyn FnMut(&dyn Layer)) {
        for layer in self {
            visit(layer);
        }
    }
}

impl<T: Layer> LayerList for Vec<T> {
    fn visit_layers(&self, visit: &mut dyn FnMut(&dyn Layer)) {
        self.as_slice().visit_layers(visit);
    }
}

impl<L: LayerList + ?Sized> LayerList for RefCell<L> {
    fn visit_layers(&self, visit: &mut dyn FnMut(&dyn Layer)) {
        self.borrow().visit_layers(visit);
    }
}
