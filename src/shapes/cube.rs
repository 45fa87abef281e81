use crate::core::common::{consts::EPSILON, Float};
use crate::core::geometry::{Bounds3, Point3, Ray, Vector3};
use crate::core::shape::{LocalHit, LocalHits, Primitive};
use smallvec::smallvec;

/// Axis-aligned cube spanning ±1 on every axis.
#[derive(Debug, Default, Copy, Clone)]
pub struct Cube;

impl Cube {
    pub fn new() -> Cube {
        Cube
    }
}

fn check_axis(origin: Float, direction: Float) -> (Float, Float) {
    let tmin_numerator = -1.0 - origin;
    let tmax_numerator = 1.0 - origin;

    let (mut tmin, mut tmax) = if direction.abs() > EPSILON {
        (tmin_numerator / direction, tmax_numerator / direction)
    } else {
        (tmin_numerator * Float::INFINITY, tmax_numerator * Float::INFINITY)
    };

    if tmin > tmax {
        std::mem::swap(&mut tmin, &mut tmax);
    }

    (tmin, tmax)
}

impl Primitive for Cube {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let (xtmin, xtmax) = check_axis(ray.origin.x, ray.direction.x);
        let (ytmin, ytmax) = check_axis(ray.origin.y, ray.direction.y);
        let (ztmin, ztmax) = check_axis(ray.origin.z, ray.direction.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        if tmin > tmax {
            return LocalHits::new();
        }

        smallvec![LocalHit::new(tmin), LocalHit::new(tmax)]
    }

    fn local_normal_at(&self, point: Point3, _hit: &LocalHit) -> Vector3 {
        let max_c = point.x.abs().max(point.y.abs()).max(point.z.abs());

        if max_c == point.x.abs() {
            Vector3::new(point.x, 0.0, 0.0)
        } else if max_c == point.y.abs() {
            Vector3::new(0.0, point.y, 0.0)
        } else {
            Vector3::new(0.0, 0.0, point.z)
        }
    }

    fn bounds(&self) -> Bounds3 {
        Bounds3::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }
}
