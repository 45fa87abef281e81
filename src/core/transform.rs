use super::common::Float;
use super::error::Error;
use super::geometry::{Bounds3, Point3, Ray, Vector3};
use super::matrix::Matrix4x4;
use std::convert::TryFrom;
use std::ops::Mul;

/// An affine transform paired with its inverse. The inverse is computed at
/// construction, never lazily: once a scene enters the concurrent render
/// phase every transform is fully materialized and read-only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Transform {
    pub fn identity() -> Transform {
        Transform {
            m: Matrix4x4::identity(),
            m_inv: Matrix4x4::identity(),
        }
    }

    /// Return the inverse of this transform.
    pub fn inverse(&self) -> Transform {
        Transform {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.m == Matrix4x4::identity()
    }

    /// Create a transform representing a translation.
    pub fn translate(x: Float, y: Float, z: Float) -> Transform {
        Transform {
            m: Matrix4x4::new(
                1.0, 0.0, 0.0, x, 0.0, 1.0, 0.0, y, 0.0, 0.0, 1.0, z, 0.0, 0.0, 0.0, 1.0,
            ),
            m_inv: Matrix4x4::new(
                1.0, 0.0, 0.0, -x, 0.0, 1.0, 0.0, -y, 0.0, 0.0, 1.0, -z, 0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Create a transform representing a scale. A zero component would make
    /// the matrix singular, which is a scene-construction error.
    pub fn scale(x: Float, y: Float, z: Float) -> Result<Transform, Error> {
        if x == 0.0 || y == 0.0 || z == 0.0 {
            return Err(Error::NonInvertibleTransform);
        }
        Ok(Transform {
            m: Matrix4x4::new(
                x, 0.0, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, 0.0, z, 0.0, 0.0, 0.0, 0.0, 1.0,
            ),
            m_inv: Matrix4x4::new(
                1.0 / x,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0 / y,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0 / z,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
            ),
        })
    }

    /// Create a transform of a rotation around the X axis in radians.
    pub fn rotate_x(theta: Float) -> Transform {
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            1.0, 0.0, 0.0, 0.0, 0.0, cos_theta, -sin_theta, 0.0, 0.0, sin_theta, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m,
            m_inv: m.transpose(),
        }
    }

    /// Create a transform of a rotation around the Y axis in radians.
    pub fn rotate_y(theta: Float) -> Transform {
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            cos_theta, 0.0, sin_theta, 0.0, 0.0, 1.0, 0.0, 0.0, -sin_theta, 0.0, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m,
            m_inv: m.transpose(),
        }
    }

    /// Create a transform of a rotation around the Z axis in radians.
    pub fn rotate_z(theta: Float) -> Transform {
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            cos_theta, -sin_theta, 0.0, 0.0, sin_theta, cos_theta, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m,
            m_inv: m.transpose(),
        }
    }

    /// Create a shearing transform; each parameter moves one coordinate in
    /// proportion to another.
    pub fn shearing(
        xy: Float,
        xz: Float,
        yx: Float,
        yz: Float,
        zx: Float,
        zy: Float,
    ) -> Result<Transform, Error> {
        Transform::try_from(Matrix4x4::new(
            1.0, xy, xz, 0.0, yx, 1.0, yz, 0.0, zx, zy, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Create the world-to-camera transform for an eye at `from` looking at
    /// `to` with the given up hint. Fails when the up hint is collinear
    /// with the view direction, which collapses the orientation basis.
    pub fn view_transform(from: Point3, to: Point3, up: Vector3) -> Result<Transform, Error> {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);
        let orientation = Matrix4x4::new(
            left.x, left.y, left.z, 0.0, true_up.x, true_up.y, true_up.z, 0.0, -forward.x,
            -forward.y, -forward.z, 0.0, 0.0, 0.0, 0.0, 1.0,
        );
        Transform::try_from(orientation * Transform::translate(-from.x, -from.y, -from.z).m)
    }

    /// Transform a point.
    pub fn transform_point(&self, p: &Point3) -> Point3 {
        let m = &self.m.m;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w == 1.0 {
            Point3::new(x, y, z)
        } else {
            Point3::new(x / w, y / w, z / w)
        }
    }

    /// Transform a direction; translation does not apply.
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        let m = &self.m.m;
        Vector3 {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        }
    }

    /// Transform a surface normal, which requires the transpose of the
    /// inverse to stay perpendicular under non-uniform scale.
    pub fn transform_normal(&self, n: &Vector3) -> Vector3 {
        let m = &self.m_inv.m;
        Vector3 {
            x: m[0][0] * n.x + m[1][0] * n.y + m[2][0] * n.z,
            y: m[0][1] * n.x + m[1][1] * n.y + m[2][1] * n.z,
            z: m[0][2] * n.x + m[1][2] * n.y + m[2][2] * n.z,
        }
    }

    /// Transform a ray. The direction is deliberately left unnormalized so
    /// that `t` values keep their meaning across spaces.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        Ray {
            origin: self.transform_point(&r.origin),
            direction: self.transform_vector(&r.direction),
        }
    }

    /// Transform a bounding box by re-boxing its eight transformed corners.
    /// Boxes with unbounded extents (planes, open cylinders) degrade to the
    /// all-containing box rather than risking NaN corners.
    pub fn transform_bounds(&self, b: &Bounds3) -> Bounds3 {
        if b.is_empty() {
            return *b;
        }
        if !b.is_finite() {
            return Bounds3::infinite();
        }
        let corners = [
            b.min,
            Point3::new(b.min.x, b.min.y, b.max.z),
            Point3::new(b.min.x, b.max.y, b.min.z),
            Point3::new(b.min.x, b.max.y, b.max.z),
            Point3::new(b.max.x, b.min.y, b.min.z),
            Point3::new(b.max.x, b.min.y, b.max.z),
            Point3::new(b.max.x, b.max.y, b.min.z),
            b.max,
        ];
        let mut out = Bounds3::empty();
        for corner in corners.iter() {
            out.add_point(self.transform_point(corner));
        }
        out
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: self.m * rhs.m,
            m_inv: rhs.m_inv * self.m_inv,
        }
    }
}

impl TryFrom<Matrix4x4> for Transform {
    type Error = Error;

    fn try_from(m: Matrix4x4) -> Result<Transform, Error> {
        let m_inv = m.inverse().ok_or(Error::NonInvertibleTransform)?;
        Ok(Transform { m, m_inv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common::{approx_eq, consts::PI};

    fn assert_point_eq(a: Point3, b: Point3) {
        assert!(
            approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z),
            "{} != {}",
            a,
            b
        );
    }

    #[test]
    fn translating_a_point() {
        let t = Transform::translate(5.0, -3.0, 2.0);
        assert_eq!(t.transform_point(&Point3::new(-3.0, 4.0, 5.0)), Point3::new(2.0, 1.0, 7.0));
        assert_eq!(
            t.inverse().transform_point(&Point3::new(-3.0, 4.0, 5.0)),
            Point3::new(-8.0, 7.0, 3.0)
        );
    }

    #[test]
    fn translation_does_not_affect_vectors() {
        let t = Transform::translate(5.0, -3.0, 2.0);
        let v = Vector3::new(-3.0, 4.0, 5.0);
        assert_eq!(t.transform_vector(&v), v);
    }

    #[test]
    fn scaling_points_and_vectors() {
        let t = Transform::scale(2.0, 3.0, 4.0).unwrap();
        assert_eq!(t.transform_point(&Point3::new(-4.0, 6.0, 8.0)), Point3::new(-8.0, 18.0, 32.0));
        assert_eq!(
            t.transform_vector(&Vector3::new(-4.0, 6.0, 8.0)),
            Vector3::new(-8.0, 18.0, 32.0)
        );
        assert_eq!(
            t.inverse().transform_vector(&Vector3::new(-4.0, 6.0, 8.0)),
            Vector3::new(-2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn a_degenerate_scale_is_rejected() {
        assert!(matches!(Transform::scale(1.0, 0.0, 1.0), Err(Error::NonInvertibleTransform)));
    }

    #[test]
    fn a_singular_matrix_is_rejected() {
        let singular = Matrix4x4::new(
            1.0, 2.0, 3.0, 4.0, 2.0, 4.0, 6.0, 8.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        );
        assert!(Transform::try_from(singular).is_err());
    }

    #[test]
    fn rotating_a_point_around_x() {
        let p = Point3::new(0.0, 1.0, 0.0);
        let half_quarter = Transform::rotate_x(PI / 4.0);
        let full_quarter = Transform::rotate_x(PI / 2.0);
        let k = 2f64.sqrt() / 2.0;
        assert_point_eq(half_quarter.transform_point(&p), Point3::new(0.0, k, k));
        assert_point_eq(full_quarter.transform_point(&p), Point3::new(0.0, 0.0, 1.0));
        assert_point_eq(half_quarter.inverse().transform_point(&p), Point3::new(0.0, k, -k));
    }

    #[test]
    fn rotating_a_point_around_y() {
        let p = Point3::new(0.0, 0.0, 1.0);
        let k = 2f64.sqrt() / 2.0;
        assert_point_eq(Transform::rotate_y(PI / 4.0).transform_point(&p), Point3::new(k, 0.0, k));
        assert_point_eq(
            Transform::rotate_y(PI / 2.0).transform_point(&p),
            Point3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn rotating_a_point_around_z() {
        let p = Point3::new(0.0, 1.0, 0.0);
        let k = 2f64.sqrt() / 2.0;
        assert_point_eq(Transform::rotate_z(PI / 4.0).transform_point(&p), Point3::new(-k, k, 0.0));
        assert_point_eq(
            Transform::rotate_z(PI / 2.0).transform_point(&p),
            Point3::new(-1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn shearing_moves_coordinates_in_proportion() {
        let p = Point3::new(2.0, 3.0, 4.0);
        let t = Transform::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(t.transform_point(&p), Point3::new(5.0, 3.0, 4.0));
        let t = Transform::shearing(0.0, 0.0, 0.0, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(t.transform_point(&p), Point3::new(2.0, 7.0, 4.0));
    }

    #[test]
    fn chained_transforms_apply_in_reverse_order() {
        let p = Point3::new(1.0, 0.0, 1.0);
        let a = Transform::rotate_x(PI / 2.0);
        let b = Transform::scale(5.0, 5.0, 5.0).unwrap();
        let c = Transform::translate(10.0, 5.0, 7.0);
        let t = c * b * a;
        assert_point_eq(t.transform_point(&p), Point3::new(15.0, 0.0, 7.0));
    }

    #[test]
    fn composed_inverse_matches_inverse_of_composition() {
        let t = Transform::translate(1.0, 2.0, 3.0)
            * Transform::rotate_y(0.7)
            * Transform::scale(2.0, 2.0, 2.0).unwrap();
        assert!((t.m * t.m_inv).approx_eq(&Matrix4x4::identity(), 1e-9));
    }

    #[test]
    fn transforming_normals_keeps_them_perpendicular() {
        let t = Transform::scale(1.0, 2.0, 1.0).unwrap();
        let n = t.transform_normal(&Vector3::new(0.0, 1.0, 0.0)).normalize();
        assert_point_eq(
            Point3::new(n.x, n.y, n.z),
            Point3::new(0.0, 1.0, 0.0),
        );
    }

    #[test]
    fn view_transform_for_the_default_orientation() {
        let t = Transform::view_transform(
            Point3::origin(),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(t.m.approx_eq(&Matrix4x4::identity(), 1e-9));
    }

    #[test]
    fn view_transform_looking_in_positive_z() {
        let t = Transform::view_transform(
            Point3::origin(),
            Point3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(t.m.approx_eq(&Transform::scale(-1.0, 1.0, -1.0).unwrap().m, 1e-9));
    }

    #[test]
    fn view_transform_moves_the_world() {
        let t = Transform::view_transform(
            Point3::new(0.0, 0.0, 8.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(t.m.approx_eq(&Transform::translate(0.0, 0.0, -8.0).m, 1e-9));
    }

    #[test]
    fn an_arbitrary_view_transform() {
        let t = Transform::view_transform(
            Point3::new(1.0, 3.0, 2.0),
            Point3::new(4.0, -2.0, 8.0),
            Vector3::new(1.0, 1.0, 0.0),
        )
        .unwrap();
        let expected = Matrix4x4::new(
            -0.50709, 0.50709, 0.67612, -2.36643, 0.76772, 0.60609, 0.12122, -2.82843, -0.35857,
            0.59761, -0.71714, 0.00000, 0.00000, 0.00000, 0.00000, 1.00000,
        );
        assert!(t.m.approx_eq(&expected, 1e-5));
        assert!((t.m * t.m_inv).approx_eq(&Matrix4x4::identity(), 1e-9));
    }

    #[test]
    fn a_collinear_up_hint_is_rejected() {
        let result = Transform::view_transform(
            Point3::origin(),
            Point3::new(0.0, 5.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert!(matches!(result, Err(Error::NonInvertibleTransform)));
    }

    #[test]
    fn transforming_a_ray() {
        let r = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 1.0, 0.0));
        let t = Transform::translate(3.0, 4.0, 5.0);
        let r2 = t.transform_ray(&r);
        assert_eq!(r2.origin, Point3::new(4.0, 6.0, 8.0));
        assert_eq!(r2.direction, Vector3::new(0.0, 1.0, 0.0));

        let s = Transform::scale(2.0, 3.0, 4.0).unwrap();
        let r3 = s.transform_ray(&r);
        assert_eq!(r3.origin, Point3::new(2.0, 6.0, 12.0));
        assert_eq!(r3.direction, Vector3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn transforming_a_bounding_box() {
        let b = Bounds3::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let t = Transform::rotate_x(PI / 4.0) * Transform::rotate_y(PI / 4.0);
        let out = t.transform_bounds(&b);
        let k = 1.414213;
        assert!(approx_eq(out.min.x, -k) || out.min.x < -k);
        assert!(out.min.x <= -1.0 && out.max.x >= 1.0);
        assert!(out.min.y <= -1.0 && out.max.y >= 1.0);
    }

    #[test]
    fn transforming_an_unbounded_box_stays_conservative() {
        let b = Bounds3::new(
            Point3::new(Float::NEG_INFINITY, 0.0, Float::NEG_INFINITY),
            Point3::new(Float::INFINITY, 0.0, Float::INFINITY),
        );
        let out = Transform::rotate_y(0.3).transform_bounds(&b);
        assert!(!out.is_empty());
        assert!(out.contains_point(Point3::new(1e9, -1e9, 0.0)));
    }
}
