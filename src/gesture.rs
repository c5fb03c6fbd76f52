//! Box gesture state machine and the geometry behind it.
//!
//! One set of pointer handlers drives every box interaction; what a pointer
//! move means depends on the current [`GestureState`]. Dragging places the box
//! at the absolute pointer position. Resizing works from deltas against the
//! box geometry captured at pointer-down, so the corner opposite the handle
//! stays put on screen.
//!
//! A pointer release fires a synthetic click on whatever sits under it. The
//! [`ClickGate`] swallows that one click so finishing a drag never toggles
//! the mark on a box.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::boxes::{BoxId, BoxPatch, ChaseBox};
use crate::consts::MIN_BOX_SIZE;
use crate::geom::{Point, SurfaceRect};

/// Resize handle position on a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Top-left; anchors the bottom-right corner.
    Nw,
    /// Top-right; anchors the bottom-left corner.
    Ne,
    /// Bottom-left; anchors the top-right corner.
    Sw,
    /// Bottom-right; anchors the top-left corner.
    Se,
}

impl Corner {
    /// Whether moving this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether moving this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }
}

/// Active box gesture between pointer-down and pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The drag handle of a box is held.
    Dragging {
        /// Box being moved.
        id: BoxId,
    },
    /// A corner handle of a box is held.
    Resizing {
        /// Box being resized.
        id: BoxId,
        /// Which handle is held.
        corner: Corner,
        /// Client-space pointer position at pointer-down.
        start_pointer: Point,
        /// Box x (percent) at pointer-down.
        orig_x: f64,
        /// Box y (percent) at pointer-down.
        orig_y: f64,
        /// Box width (px) at pointer-down.
        orig_w: f64,
        /// Box height (px) at pointer-down.
        orig_h: f64,
    },
}

impl GestureState {
    /// Start a resize on `target` from `corner`, capturing its current geometry.
    #[must_use]
    pub fn resizing(target: &ChaseBox, corner: Corner, start_pointer: Point) -> Self {
        Self::Resizing {
            id: target.id,
            corner,
            start_pointer,
            orig_x: target.x,
            orig_y: target.y,
            orig_w: target.width,
            orig_h: target.height,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Box targeted by the active gesture.
    #[must_use]
    pub fn target(&self) -> Option<BoxId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id } | Self::Resizing { id, .. } => Some(*id),
        }
    }

    /// Field updates for a pointer move to `pointer`, or `None` if nothing should change.
    ///
    /// `rect` is the live bounding rectangle of the prize container.
    #[must_use]
    pub fn on_pointer_move(&self, pointer: Point, rect: SurfaceRect) -> Option<BoxPatch> {
        match *self {
            Self::Idle => None,
            Self::Dragging { .. } => {
                let at = drag_position(pointer, rect)?;
                Some(BoxPatch { x: Some(at.x), y: Some(at.y), ..BoxPatch::default() })
            }
            Self::Resizing { corner, start_pointer, orig_x, orig_y, orig_w, orig_h, .. } => {
                let origin = Origin { x: orig_x, y: orig_y, width: orig_w, height: orig_h };
                resize_from(corner, origin, pointer.x - start_pointer.x, pointer.y - start_pointer.y, rect)
            }
        }
    }
}

/// Box geometry captured when a resize starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Percent position for a dragged box with its handle under `pointer`, clamped to the container.
///
/// `None` while the container has no area.
#[must_use]
pub fn drag_position(pointer: Point, rect: SurfaceRect) -> Option<Point> {
    let pct = rect.to_percent(pointer)?;
    Some(Point::new(pct.x.clamp(0.0, 100.0), pct.y.clamp(0.0, 100.0)))
}

/// Resize math for one corner given the pointer delta since pointer-down.
///
/// Width and height never drop below the minimum box size. For handles that
/// move the left or top edge, the position shifts by the size change
/// (converted to percent of `rect`) so the opposite edge stays fixed. Those
/// handles yield `None` while `rect` has no area; the SE handle never needs it.
#[must_use]
pub fn resize_from(corner: Corner, origin: Origin, dx: f64, dy: f64, rect: SurfaceRect) -> Option<BoxPatch> {
    let raw_width = if corner.moves_left() { origin.width - dx } else { origin.width + dx };
    let raw_height = if corner.moves_top() { origin.height - dy } else { origin.height + dy };
    let width = raw_width.max(MIN_BOX_SIZE);
    let height = raw_height.max(MIN_BOX_SIZE);

    let mut patch = BoxPatch { width: Some(width), height: Some(height), ..BoxPatch::default() };
    if corner.moves_left() {
        patch.x = Some(origin.x + rect.px_to_percent_x(origin.width - width)?);
    }
    if corner.moves_top() {
        patch.y = Some(origin.y + rect.px_to_percent_y(origin.height - height)?);
    }
    Some(patch)
}

/// One-shot "suppress next click" token.
///
/// Armed when a drag or resize ends, consumed by the next click, and
/// cleared whenever a new pointer-down cycle starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickGate {
    armed: bool,
}

impl ClickGate {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn clear(&mut self) {
        self.armed = false;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether this click should be swallowed. Disarms the gate either way.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}
