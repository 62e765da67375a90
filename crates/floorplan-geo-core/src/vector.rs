//! 2D vector helpers shared by page space and projected space.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Returned by [`displacement_to`] when both points coincide and the
/// direction of the displacement is undefined.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("displacement between coincident points ({x}, {y}) has no direction")]
pub struct DegenerateInputError {
    pub x: f64,
    pub y: f64,
}

/// A direction (unit vector) and a distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    pub direction: Vector2<f64>,
    pub distance: f64,
}

impl Displacement {
    /// The displacement as a plain vector (`direction * distance`).
    #[inline]
    pub fn to_vector(&self) -> Vector2<f64> {
        self.direction * self.distance
    }
}

#[inline]
pub fn dot(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.x + a.y * b.y
}

#[inline]
pub fn scale(v: &Vector2<f64>, factor: f64) -> Vector2<f64> {
    Vector2::new(v.x * factor, v.y * factor)
}

/// Rotate `v` by `radians` in the positive direction.
///
/// In a right-handed (y-up) frame positive radians are counter-clockwise.
/// In a y-down frame such as projected map space the same rotation reads as
/// clockwise.
#[inline]
pub fn rotate(v: &Vector2<f64>, radians: f64) -> Vector2<f64> {
    let (sin, cos) = radians.sin_cos();
    Vector2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

#[inline]
pub fn midpoint(a: &Point2<f64>, b: &Point2<f64>) -> Point2<f64> {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Displacement from `a` to `b`.
pub fn displacement_to(
    a: &Point2<f64>,
    b: &Point2<f64>,
) -> Result<Displacement, DegenerateInputError> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let distance = dx.hypot(dy);
    if distance == 0.0 || !distance.is_finite() {
        return Err(DegenerateInputError { x: a.x, y: a.y });
    }
    Ok(Displacement {
        direction: Vector2::new(dx / distance, dy / distance),
        distance,
    })
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this does not panic when `min > max`; `min` wins.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// The argument with the smaller magnitude, e.g. `smallest(-5.0, 0.01) == 0.01`.
/// Ties pick `a`.
#[inline]
pub fn smallest(a: f64, b: f64) -> f64 {
    if a.abs() <= b.abs() {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotation_is_counter_clockwise_in_y_up_frame() {
        let east = Vector2::new(1.0, 0.0);
        let north = rotate(&east, FRAC_PI_2);
        assert_abs_diff_eq!(north.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(north.y, 1.0, epsilon = 1e-12);

        let south = rotate(&east, -FRAC_PI_2);
        assert_abs_diff_eq!(south.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(south.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vector2::new(3.0, -4.0);
        for k in 0..12 {
            let r = rotate(&v, k as f64 * 0.37);
            assert_abs_diff_eq!(r.norm(), 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn dot_and_scale() {
        let a = Vector2::new(2.0, 3.0);
        let b = Vector2::new(-1.0, 4.0);
        assert_eq!(dot(&a, &b), 10.0);
        assert_eq!(scale(&a, 0.5), Vector2::new(1.0, 1.5));
    }

    #[test]
    fn midpoint_averages() {
        let m = midpoint(&Point2::new(0.0, 10.0), &Point2::new(4.0, -2.0));
        assert_eq!(m, Point2::new(2.0, 4.0));
    }

    #[test]
    fn displacement_has_unit_direction() {
        let d = displacement_to(&Point2::new(1.0, 1.0), &Point2::new(4.0, 5.0)).expect("distinct");
        assert_abs_diff_eq!(d.distance, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.direction.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.to_vector().x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.to_vector().y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn displacement_between_coincident_points_fails() {
        let p = Point2::new(7.5, -2.0);
        let err = displacement_to(&p, &p).unwrap_err();
        assert_eq!(err, DegenerateInputError { x: 7.5, y: -2.0 });
    }

    #[test]
    fn clamp_and_smallest() {
        assert_eq!(clamp(5.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
        assert_eq!(smallest(-5.0, 0.01), 0.01);
        assert_eq!(smallest(-2.0, 2.0), -2.0);
    }
}
