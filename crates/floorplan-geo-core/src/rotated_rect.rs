//! Arbitrarily rotated rectangles in projected space.
//!
//! A floorplan page box that is not north-up cannot be represented by an
//! axis-aligned [`MapRect`](crate::MapRect). [`RotatedRect`] keeps the
//! center, the size and the two axis directions, which is enough to answer
//! containment and nearest-point queries by projecting onto each axis and
//! clamping as if the rectangle were upright.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::projection::{MapPoint, MapSize};
use crate::vector::{clamp, displacement_to, dot, midpoint, DegenerateInputError, Displacement};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RotatedRectError {
    #[error("corner order makes opposite edges cross")]
    SelfIntersecting,
    #[error("corners are collinear or coincident")]
    Degenerate,
    #[error(transparent)]
    DegenerateAxis(#[from] DegenerateInputError),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: MapPoint,
    pub size: MapSize,
    /// Unit vector along the width axis.
    pub width_direction: Vector2<f64>,
    /// Unit vector along the height axis.
    pub height_direction: Vector2<f64>,
}

fn turn(a: &MapPoint, b: &MapPoint, c: &MapPoint) -> f64 {
    let ab = b - a;
    let bc = c - b;
    ab.x * bc.y - ab.y * bc.x
}

/// True when segments `a1 a2` and `b1 b2` cross at a point interior to both.
fn segments_cross(a1: &MapPoint, a2: &MapPoint, b1: &MapPoint, b2: &MapPoint) -> bool {
    turn(a1, a2, b1) * turn(a1, a2, b2) < 0.0 && turn(b1, b2, a1) * turn(b1, b2, a2) < 0.0
}

impl RotatedRect {
    /// Build from four corners given in going-around order (clockwise or
    /// counter-clockwise, never criss-crossing).
    ///
    /// Real corner data is rarely a perfect rectangle, so each axis is taken
    /// between the midpoints of the two edges it crosses. Any simple
    /// quadrilateral is accepted, concave ones included; corner orders whose
    /// opposite edges cross are rejected.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    pub fn from_corners(
        c1: MapPoint,
        c2: MapPoint,
        c3: MapPoint,
        c4: MapPoint,
    ) -> Result<Self, RotatedRectError> {
        let corners = [c1, c2, c3, c4];
        let turns: [f64; 4] = std::array::from_fn(|i| {
            turn(&corners[i], &corners[(i + 1) % 4], &corners[(i + 2) % 4])
        });
        if turns.iter().any(|t| *t == 0.0 || !t.is_finite()) {
            return Err(RotatedRectError::Degenerate);
        }
        if segments_cross(&c1, &c2, &c3, &c4) || segments_cross(&c2, &c3, &c4, &c1) {
            return Err(RotatedRectError::SelfIntersecting);
        }

        let center = MapPoint::new(
            (c1.x + c2.x + c3.x + c4.x) / 4.0,
            (c1.y + c2.y + c3.y + c4.y) / 4.0,
        );

        let width = displacement_to(&midpoint(&c2, &c3), &midpoint(&c1, &c4))?;
        let height = displacement_to(&midpoint(&c4, &c3), &midpoint(&c1, &c2))?;

        Ok(Self {
            center,
            size: MapSize::new(width.distance, height.distance),
            width_direction: width.direction,
            height_direction: height.direction,
        })
    }

    /// Signed offsets of `p` from the center along the width and height axes.
    pub fn axis_offsets(&self, p: &MapPoint) -> (f64, f64) {
        let d = p - self.center;
        (dot(&d, &self.width_direction), dot(&d, &self.height_direction))
    }

    fn point_at(&self, width_offset: f64, height_offset: f64) -> MapPoint {
        self.center + self.width_direction * width_offset + self.height_direction * height_offset
    }

    /// The point inside the rectangle closest to `p`.
    pub fn nearest_point(&self, p: &MapPoint) -> MapPoint {
        let (w, h) = self.axis_offsets(p);
        let half_w = 0.5 * self.size.width;
        let half_h = 0.5 * self.size.height;
        self.point_at(clamp(w, -half_w, half_w), clamp(h, -half_h, half_h))
    }

    pub fn contains(&self, p: &MapPoint) -> bool {
        let (w, h) = self.axis_offsets(p);
        let tol = 1e-9 * self.size.width.max(self.size.height).max(1.0);
        w.abs() <= 0.5 * self.size.width + tol && h.abs() <= 0.5 * self.size.height + tol
    }

    /// Displacement from `p` to the nearest point inside, `None` when `p` is inside.
    pub fn displacement_to_nearest(&self, p: &MapPoint) -> Option<Displacement> {
        if self.contains(p) {
            return None;
        }
        displacement_to(p, &self.nearest_point(p)).ok()
    }

    /// Corners in the same rotational order accepted by [`RotatedRect::from_corners`].
    pub fn corners(&self) -> [MapPoint; 4] {
        let hw = 0.5 * self.size.width;
        let hh = 0.5 * self.size.height;
        [
            self.point_at(hw, hh),
            self.point_at(-hw, hh),
            self.point_at(-hw, -hh),
            self.point_at(hw, -hh),
        ]
    }
}
