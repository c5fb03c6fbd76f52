#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in client space (CSS pixels) or in container percent space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Live bounding rectangle of a rendering surface, in client pixels.
///
/// Queried fresh at every pointer event and draw, never stored in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether the surface has been laid out with a non-zero area.
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Convert a client-space point to percent of this rect.
    ///
    /// Returns `None` while the surface has no area.
    #[must_use]
    pub fn to_percent(&self, client: Point) -> Option<Point> {
        if !self.is_laid_out() {
            return None;
        }
        Some(Point {
            x: (client.x - self.left) / self.width * 100.0,
            y: (client.y - self.top) / self.height * 100.0,
        })
    }

    /// Convert a percent point back to client pixels.
    #[must_use]
    pub fn to_client(&self, percent: Point) -> Point {
        Point {
            x: self.left + percent.x / 100.0 * self.width,
            y: self.top + percent.y / 100.0 * self.height,
        }
    }

    /// Convert a horizontal pixel distance to percent of the width.
    #[must_use]
    pub fn px_to_percent_x(&self, px: f64) -> Option<f64> {
        if !self.is_laid_out() {
            return None;
        }
        Some(px * 100.0 / self.width)
    }

    /// Convert a vertical pixel distance to percent of the height.
    #[must_use]
    pub fn px_to_percent_y(&self, px: f64) -> Option<f64> {
        if !self.is_laid_out() {
            return None;
        }
        Some(px * 100.0 / self.height)
    }
}
