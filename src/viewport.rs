//! Zoom/pan state for an image surface.
//!
//! A [`Viewport`] owns one [`Transform`] plus three independent gesture
//! switches. The prize surface and the insurance surface each get their own
//! viewport; only the prize one is persisted, which the engine decides by
//! looking at [`Viewport::is_persisted`].

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE, WHEEL_STEP};
use crate::geom::Point;

/// Scale and pan offset of a surface.
///
/// Offsets are in CSS pixels; `scale` is a plain factor (1.0 = fit).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    #[serde(rename = "positionX")]
    pub offset_x: f64,
    #[serde(rename = "positionY")]
    pub offset_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Transform {
    /// Map a point in untransformed content space to screen space.
    #[must_use]
    pub fn content_to_screen(&self, content: Point) -> Point {
        Point {
            x: content.x * self.scale + self.offset_x,
            y: content.y * self.scale + self.offset_y,
        }
    }

    /// Map a screen-space point back to content space.
    #[must_use]
    pub fn screen_to_content(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }
}

/// Clamp a scale factor into the allowed zoom range. Non-finite input maps to 1.0.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() { scale.clamp(MIN_SCALE, MAX_SCALE) } else { 1.0 }
}

/// Which viewport gestures are currently honoured.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureToggles {
    /// Drag-to-pan.
    pub pan: bool,
    /// Mouse-wheel zoom.
    pub wheel: bool,
    /// Two-finger pinch zoom.
    pub pinch: bool,
    /// Double click / double tap reset.
    pub double_activate: bool,
}

impl Default for GestureToggles {
    fn default() -> Self {
        Self::all(true)
    }
}

impl GestureToggles {
    /// Every gesture set to `enabled`.
    #[must_use]
    pub fn all(enabled: bool) -> Self {
        Self { pan: enabled, wheel: enabled, pinch: enabled, double_activate: enabled }
    }
}

/// Zoom/pan controller for one surface.
#[derive(Debug, Clone)]
pub struct Viewport {
    transform: Transform,
    toggles: GestureToggles,
    persisted: bool,
}

impl Viewport {
    /// A viewport whose transform changes should be written to storage.
    #[must_use]
    pub fn persisted() -> Self {
        Self { transform: Transform::default(), toggles: GestureToggles::default(), persisted: true }
    }

    /// A viewport that lives only in memory.
    #[must_use]
    pub fn transient() -> Self {
        Self { transform: Transform::default(), toggles: GestureToggles::default(), persisted: false }
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[must_use]
    pub fn toggles(&self) -> GestureToggles {
        self.toggles
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn set_toggles(&mut self, toggles: GestureToggles) {
        self.toggles = toggles;
    }

    /// Restore a transform read from storage, clamping the scale.
    pub fn restore(&mut self, transform: Transform) {
        self.transform = sanitize(transform);
    }

    /// Set scale and offsets directly. Returns true if anything changed.
    pub fn set_transform(&mut self, scale: f64, offset_x: f64, offset_y: f64) -> bool {
        let next = sanitize(Transform { scale, offset_x, offset_y });
        if next == self.transform {
            return false;
        }
        self.transform = next;
        true
    }

    /// Return to scale 1 at the origin (double click / double tap).
    pub fn reset_transform(&mut self) -> bool {
        if !self.toggles.double_activate {
            return false;
        }
        self.set_transform(1.0, 0.0, 0.0)
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !self.toggles.pan {
            return false;
        }
        let t = self.transform;
        self.set_transform(t.scale, t.offset_x + dx, t.offset_y + dy)
    }

    /// Zoom one wheel step around `anchor` (screen space).
    ///
    /// Negative `delta_y` (wheel up) zooms in.
    pub fn wheel(&mut self, delta_y: f64, anchor: Point) -> bool {
        if !self.toggles.wheel || delta_y == 0.0 {
            return false;
        }
        let step = if delta_y < 0.0 { WHEEL_STEP } else { -WHEEL_STEP };
        let target = self.transform.scale + step;
        self.zoom_to(target, anchor)
    }

    /// Multiply the scale by a pinch ratio around `anchor` (screen space).
    pub fn pinch(&mut self, ratio: f64, anchor: Point) -> bool {
        if !self.toggles.pinch || !ratio.is_finite() || ratio <= 0.0 {
            return false;
        }
        let target = self.transform.scale * ratio;
        self.zoom_to(target, anchor)
    }

    /// Change scale while keeping the content point under `anchor` fixed on screen.
    fn zoom_to(&mut self, target_scale: f64, anchor: Point) -> bool {
        let scale = clamp_scale(target_scale);
        let content = self.transform.screen_to_content(anchor);
        let offset_x = anchor.x - content.x * scale;
        let offset_y = anchor.y - content.y * scale;
        self.set_transform(scale, offset_x, offset_y)
    }
}

fn sanitize(t: Transform) -> Transform {
    Transform {
        scale: clamp_scale(t.scale),
        offset_x: if t.offset_x.is_finite() { t.offset_x } else { 0.0 },
        offset_y: if t.offset_y.is_finite() { t.offset_y } else { 0.0 },
    }
}
