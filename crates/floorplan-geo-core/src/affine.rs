use nalgebra::{Matrix2, Matrix3, Point2, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// 2D affine transform stored as a homogeneous 3x3 matrix.
///
/// Components follow the usual graphics layout:
/// `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub m: Matrix3<f64>,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self {
            m: Matrix3::new(
                a, c, tx, //
                b, d, ty, //
                0.0, 0.0, 1.0,
            ),
        }
    }

    pub fn from_linear(linear: Matrix2<f64>) -> Self {
        Self::new(
            linear[(0, 0)],
            linear[(1, 0)],
            linear[(0, 1)],
            linear[(1, 1)],
            0.0,
            0.0,
        )
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// `(a, b, c, d, tx, ty)`.
    pub fn components(&self) -> [f64; 6] {
        [
            self.m[(0, 0)],
            self.m[(1, 0)],
            self.m[(0, 1)],
            self.m[(1, 1)],
            self.m[(0, 2)],
            self.m[(1, 2)],
        ]
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.m[(0, 0)], self.m[(0, 1)], self.m[(0, 2)]],
            [self.m[(1, 0)], self.m[(1, 1)], self.m[(1, 2)]],
            [self.m[(2, 0)], self.m[(2, 1)], self.m[(2, 2)]],
        ]
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self { m: next.m * self.m }
    }

    /// Apply `first`, then `self`.
    pub fn pre_concat(&self, first: &AffineTransform) -> Self {
        Self { m: self.m * first.m }
    }

    /// Translate by `(tx, ty)` before applying `self`.
    pub fn pre_translate(&self, tx: f64, ty: f64) -> Self {
        self.pre_concat(&Self::translation(tx, ty))
    }

    /// Scale by `(sx, sy)` before applying `self`.
    pub fn pre_scale(&self, sx: f64, sy: f64) -> Self {
        self.pre_concat(&Self::scaling(sx, sy))
    }

    #[inline]
    pub fn apply(&self, p: &Point2<f64>) -> Point2<f64> {
        let v = self.m * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v[0], v[1])
    }

    /// Apply only the linear part.
    #[inline]
    pub fn apply_vector(&self, v: &Vector2<f64>) -> Vector2<f64> {
        let r = self.m * Vector3::new(v.x, v.y, 0.0);
        Vector2::new(r[0], r[1])
    }

    pub fn determinant(&self) -> f64 {
        self.m[(0, 0)] * self.m[(1, 1)] - self.m[(0, 1)] * self.m[(1, 0)]
    }

    pub fn inverse(&self) -> Option<Self> {
        if self.determinant().abs() < 1e-300 {
            return None;
        }
        self.m.try_inverse().map(|m| Self { m })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        assert!(
            (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol,
            "expected ({:.9},{:.9}) ~ ({:.9},{:.9}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn components_follow_graphics_layout() {
        let t = AffineTransform::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(t.components(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        // x' = 1*1 + 3*1 + 5, y' = 2*1 + 4*1 + 6
        assert_eq!(t.apply(&Point2::new(1.0, 1.0)), Point2::new(9.0, 12.0));
        assert_eq!(t.determinant(), -2.0);
    }

    #[test]
    fn pre_operations_apply_first() {
        let t = AffineTransform::translation(10.0, 0.0).pre_scale(2.0, 2.0);
        assert_eq!(t.apply(&Point2::new(1.0, 1.0)), Point2::new(12.0, 2.0));

        let u = AffineTransform::scaling(2.0, 2.0).then(&AffineTransform::translation(10.0, 0.0));
        assert_eq!(t, u);

        let v = AffineTransform::scaling(2.0, 2.0).pre_translate(10.0, 0.0);
        assert_eq!(v.apply(&Point2::new(1.0, 1.0)), Point2::new(22.0, 2.0));
    }

    #[test]
    fn apply_vector_ignores_translation() {
        let t = AffineTransform::new(0.0, 1.0, -1.0, 0.0, 100.0, 100.0);
        let v = t.apply_vector(&Vector2::new(1.0, 0.0));
        assert_abs_diff_eq!(v.x, 0.0);
        assert_abs_diff_eq!(v.y, 1.0);
    }

    #[test]
    fn inverse_round_trips_points() {
        let t = AffineTransform::new(0.8, -0.3, 0.25, 1.1, 1.0e6, -4.0e5);
        let inv = t.inverse().expect("invertible");
        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(50.0, -20.0),
            Point2::new(320.0, 200.0),
        ] {
            assert_close(inv.apply(&t.apply(&p)), p, 1e-6);
        }
    }

    #[test]
    fn singular_transform_has_no_inverse() {
        let t = AffineTransform::from_linear(Matrix2::new(1.0, 2.0, 2.0, 4.0));
        assert!(t.inverse().is_none());
    }
}
