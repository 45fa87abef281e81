use crate::core::geometry::{Bounds3, Point3, Ray, Vector3};
use crate::core::shape::{LocalHit, LocalHits, Primitive};
use smallvec::smallvec;

/// Unit sphere centered on the origin.
#[derive(Debug, Default, Copy, Clone)]
pub struct Sphere;

impl Sphere {
    pub fn new() -> Sphere {
        Sphere
    }
}

impl Primitive for Sphere {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let sphere_to_ray = ray.origin - Point3::origin();

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return LocalHits::new();
        }

        let sqrt_d = discriminant.sqrt();
        smallvec![
            LocalHit::new((-b - sqrt_d) / (2.0 * a)),
            LocalHit::new((-b + sqrt_d) / (2.0 * a)),
        ]
    }

    fn local_normal_at(&self, point: Point3, _hit: &LocalHit) -> Vector3 {
        point - Point3::origin()
    }

    fn bounds(&self) -> Bounds3 {
        Bounds3::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common::approx_eq;

    fn hits(origin: Point3, direction: Vector3) -> LocalHits {
        Sphere::new().local_intersect(&Ray::new(origin, direction))
    }

    #[test]
    fn a_ray_intersects_a_sphere_at_two_points() {
        let xs = hits(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0].t, 4.0);
        assert_eq!(xs[1].t, 6.0);
    }

    #[test]
    fn a_ray_intersects_a_sphere_at_a_tangent() {
        let xs = hits(Point3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0].t, 5.0);
        assert_eq!(xs[1].t, 5.0);
    }

    #[test]
    fn a_ray_misses_a_sphere() {
        let xs = hits(Point3::new(0.0, 2.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(xs.is_empty());
    }

    #[test]
    fn a_ray_originating_inside_a_sphere() {
        let xs = hits(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(xs[0].t, -1.0);
        assert_eq!(xs[1].t, 1.0);
    }

    #[test]
    fn a_sphere_behind_a_ray() {
        let xs = hits(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(xs[0].t, -6.0);
        assert_eq!(xs[1].t, -4.0);
    }

    #[test]
    fn hits_lie_on_the_surface() {
        let ray = Ray::new(Point3::new(0.3, -0.2, -5.0), Vector3::new(0.0, 0.1, 1.0).normalize());
        for hit in Sphere::new().local_intersect(&ray) {
            let p = ray.position(hit.t);
            assert!(approx_eq((p - Point3::origin()).length(), 1.0));
        }
    }

    #[test]
    fn normals_on_the_axes() {
        let s = Sphere::new();
        let hit = LocalHit::new(0.0);
        assert_eq!(s.local_normal_at(Point3::new(1.0, 0.0, 0.0), &hit), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(s.local_normal_at(Point3::new(0.0, 1.0, 0.0), &hit), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(s.local_normal_at(Point3::new(0.0, 0.0, 1.0), &hit), Vector3::new(0.0, 0.0, 1.0));
        let k = 3f64.sqrt() / 3.0;
        let n = s.local_normal_at(Point3::new(k, k, k), &hit);
        assert!(approx_eq(n.x, k) && approx_eq(n.y, k) && approx_eq(n.z, k));
    }

    #[test]
    fn sphere_bounds() {
        let b = Sphere::new().bounds();
        assert_eq!(b.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(b.max, Point3::new(1.0, 1.0, 1.0));
    }
}
