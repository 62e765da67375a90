use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page space (for example a PDF page box).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageRect {
    /// Build a rectangle; negative sizes are normalised.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 {
            (x + width, -width)
        } else {
            (x, width)
        };
        let (y, height) = if height < 0.0 {
            (y + height, -height)
        } else {
            (y, height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x.min(self.x + self.width)
    }

    pub fn max_x(&self) -> f64 {
        self.x.max(self.x + self.width)
    }

    pub fn min_y(&self) -> f64 {
        self.y.min(self.y + self.height)
    }

    pub fn max_y(&self) -> f64 {
        self.y.max(self.y + self.height)
    }

    pub fn mid(&self) -> Point2<f64> {
        Point2::new(
            (self.min_x() + self.max_x()) * 0.5,
            (self.min_y() + self.max_y()) * 0.5,
        )
    }

    /// Corners as `(maxX, maxY), (minX, maxY), (minX, minY), (maxX, minY)`.
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            Point2::new(self.max_x(), self.max_y()),
            Point2::new(self.min_x(), self.max_y()),
            Point2::new(self.min_x(), self.min_y()),
            Point2::new(self.max_x(), self.min_y()),
        ]
    }
}
