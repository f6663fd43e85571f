// Copyright 2025 the Mapview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Pointer button reported with press and release events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the wheel button.
    Middle,
    /// Any other button, by platform index.
    Other(u16),
}

/// Direction of a rubber‑band zoom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoomAction {
    /// Show the dragged rectangle.
    In,
    /// Show the current view inside the dragged rectangle.
    Out,
}

/// Button bindings for [`crate::ZoomGesture`] and drag‑to‑pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    /// Button whose release zooms in.
    pub zoom_in_button: PointerButton,
    /// Button whose release zooms out.
    pub zoom_out_button: PointerButton,
    /// Button that drags the view when panning.
    pub pan_button: PointerButton,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            zoom_in_button: PointerButton::Primary,
            zoom_out_button: PointerButton::Secondary,
            pan_button: PointerButton::Primary,
        }
    }
}

impl GestureConfig {
    /// Zoom direction bound to `button`, if any.
    #[must_use]
    pub fn action_for(&self, button: PointerButton) -> Option<ZoomAction> {
        if button == self.zoom_in_button {
            Some(ZoomAction::In)
        } else if button == self.zoom_out_button {
            Some(ZoomAction::Out)
        } else {
            None
        }
    }

    /// Returns `true` if `button` drives a pan.
    #[must_use]
    pub fn pans_with(&self, button: PointerButton) -> bool {
        button == self.pan_button
    }
}
