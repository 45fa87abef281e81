use crate::core::common::{consts::EPSILON, Float};
use crate::core::geometry::{Bounds3, Point3, Ray, Vector3};
use crate::core::shape::{LocalHit, LocalHits, Primitive};
use smallvec::smallvec;

/// The xz plane through the origin, infinite in extent.
#[derive(Debug, Default, Copy, Clone)]
pub struct Plane;

impl Plane {
    pub fn new() -> Plane {
        Plane
    }
}

impl Primitive for Plane {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        if ray.direction.y.abs() < EPSILON {
            return LocalHits::new();
        }
        smallvec![LocalHit::new(-ray.origin.y / ray.direction.y)]
    }

    fn local_normal_at(&self, _point: Point3, _hit: &LocalHit) -> Vector3 {
        Vector3::new(0.0, 1.0, 0.0)
    }

    fn bounds(&self) -> Bounds3 {
        Bounds3::new(
            Point3::new(Float::NEG_INFINITY, 0.0, Float::NEG_INFINITY),
            Point3::new(Float::INFINITY, 0.0, Float::INFINITY),
        )
    }
}
