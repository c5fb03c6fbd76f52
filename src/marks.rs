//! Point marks placed on insurance images.

#[cfg(test)]
#[path = "marks_test.rs"]
mod marks_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MARK_UNIT_PX, MAX_MARK_SIZE, MIN_MARK_SIZE};
use crate::geom::{Point, SurfaceRect};

/// Glyph scale for newly placed marks, always within the allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MarkSize(u32);

impl MarkSize {
    /// Clamp `n` into the allowed range.
    #[must_use]
    pub fn new(n: u32) -> Self {
        Self(n.clamp(MIN_MARK_SIZE, MAX_MARK_SIZE))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Rendered glyph edge length in pixels.
    #[must_use]
    pub fn glyph_px(self) -> f64 {
        f64::from(self.0) * MARK_UNIT_PX
    }
}

impl Default for MarkSize {
    fn default() -> Self {
        Self(MIN_MARK_SIZE)
    }
}

/// A single mark on an image.
///
/// `x`/`y` are percent of the image box, already shifted back by half the
/// glyph so the rendered glyph centres on the click. `size` is the glyph scale
/// in effect when the mark was placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMark {
    pub x: f64,
    pub y: f64,
    pub size: u32,
}

impl PointMark {
    /// Build a mark for a click at `client` over the image occupying `image`.
    ///
    /// Returns `None` while the image has no laid-out area.
    #[must_use]
    pub fn at_click(client: Point, image: SurfaceRect, size: MarkSize) -> Option<Self> {
        if !image.is_laid_out() {
            return None;
        }
        let half = size.glyph_px() / 2.0;
        let x = (client.x - image.left - half) / image.width * 100.0;
        let y = (client.y - image.top - half) / image.height * 100.0;
        Some(Self { x, y, size: size.get() })
    }

    /// Size clamped into range, for marks read from storage.
    #[must_use]
    pub fn mark_size(&self) -> MarkSize {
        MarkSize::new(self.size)
    }
}
