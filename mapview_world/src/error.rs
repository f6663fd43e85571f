// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::subset::Subset;

/// Reasons a [`crate::World`] mutation was refused.
///
/// Every variant is recoverable: the world keeps its previous state and the
/// caller decides whether to retry, ignore, or report.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The subset has zero width or zero height.
    #[error("subset {0:?} has zero width or height")]
    Degenerate(Subset),
    /// The subset contains NaN or infinite coordinates.
    #[error("subset {0:?} has non-finite coordinates")]
    NonFinite(Subset),
    /// A viewport with a zero dimension was requested.
    #[error("viewport {width}x{height} has a zero dimension")]
    ZeroViewport {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The operation needs a realized viewport and none has been set yet.
    #[error("viewport is not realized")]
    ViewportNotRealized,
}

/// Checks that `subset` can be used as a world or window.
pub(crate) fn validate(subset: Subset) -> Result<Subset, WorldError> {
    if !subset.is_finite() {
        return Err(WorldError::NonFinite(subset));
    }
    if subset.is_degenerate() {
        return Err(WorldError::Degenerate(subset));
    }
    Ok(subset)
}
