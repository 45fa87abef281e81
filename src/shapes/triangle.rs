use crate::core::common::consts::EPSILON;
use crate::core::geometry::{Bounds3, Point3, Ray, Vector3};
use crate::core::shape::{LocalHit, LocalHits, Primitive};
use smallvec::smallvec;

/// Flat triangle with a precomputed edge basis and face normal.
#[derive(Debug, Copy, Clone)]
pub struct Triangle {
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
    pub e1: Vector3,
    pub e2: Vector3,
    pub normal: Vector3,
}

impl Triangle {
    pub fn new(p1: Point3, p2: Point3, p3: Point3) -> Triangle {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        Triangle {
            p1,
            p2,
            p3,
            e1,
            e2,
            normal: e2.cross(&e1).normalize(),
        }
    }
}

/// Möller–Trumbore intersection shared by both triangle kinds.
fn intersect_triangle(p1: Point3, e1: Vector3, e2: Vector3, ray: &Ray) -> Option<LocalHit> {
    let dir_cross_e2 = ray.direction.cross(&e2);
    let det = e1.dot(&dir_cross_e2);
    if det.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let p1_to_origin = ray.origin - p1;
    let u = f * p1_to_origin.dot(&dir_cross_e2);
    if u < 0.0 || u > 1.0 {
        return None;
    }

    let origin_cross_e1 = p1_to_origin.cross(&e1);
    let v = f * ray.direction.dot(&origin_cross_e1);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * e2.dot(&origin_cross_e1);
    Some(LocalHit::with_uv(t, u, v))
}

fn triangle_bounds(p1: Point3, p2: Point3, p3: Point3) -> Bounds3 {
    let mut bb = Bounds3::empty();
    bb.add_point(p1);
    bb.add_point(p2);
    bb.add_point(p3);
    bb
}

impl Primitive for Triangle {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        match intersect_triangle(self.p1, self.e1, self.e2, ray) {
            Some(hit) => smallvec![hit],
            None => LocalHits::new(),
        }
    }

    fn local_normal_at(&self, _point: Point3, _hit: &LocalHit) -> Vector3 {
        self.normal
    }

    fn bounds(&self) -> Bounds3 {
        triangle_bounds(self.p1, self.p2, self.p3)
    }
}

/// Triangle with per-vertex normals, interpolated barycentrically at the
/// hit so meshes shade smoothly across faces.
#[derive(Debug, Copy, Clone)]
pub struct SmoothTriangle {
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
    pub n1: Vector3,
    pub n2: Vector3,
    pub n3: Vector3,
    pub e1: Vector3,
    pub e2: Vector3,
}

impl SmoothTriangle {
    pub fn new(
        p1: Point3,
        p2: Point3,
        p3: Point3,
        n1: Vector3,
        n2: Vector3,
        n3: Vector3,
    ) -> SmoothTriangle {
        SmoothTriangle {
            p1,
            p2,
            p3,
            n1,
            n2,
            n3,
            e1: p2 - p1,
            e2: p3 - p1,
        }
    }
}

impl Primitive for SmoothTriangle {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        match intersect_triangle(self.p1, self.e1, self.e2, ray) {
            Some(hit) => smallvec![hit],
            None => LocalHits::new(),
        }
    }

    fn local_normal_at(&self, _point: Point3, hit: &LocalHit) -> Vector3 {
        let (u, v) = hit.uv.unwrap_or((0.0, 0.0));
        (self.n2 * u + self.n3 * v + self.n1 * (1.0 - u - v)).normalize()
    }

    fn bounds(&self) -> Bounds3 {
        triangle_bounds(self.p1, self.p2, self.p3)
    }
}
