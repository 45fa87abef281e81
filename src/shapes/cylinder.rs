use crate::core::common::{consts::EPSILON, Float};
use crate::core::geometry::{Bounds3, Point3, Ray, Vector3};
use crate::core::shape::{LocalHit, LocalHits, Primitive};

/// Y-axis-aligned cylinder of radius 1, optionally truncated and capped.
/// The `minimum`/`maximum` extents are exclusive.
#[derive(Debug, Copy, Clone)]
pub struct Cylinder {
    pub minimum: Float,
    pub maximum: Float,
    pub closed: bool,
}

impl Cylinder {
    pub fn new() -> Cylinder {
        Cylinder {
            minimum: Float::NEG_INFINITY,
            maximum: Float::INFINITY,
            closed: false,
        }
    }

    pub fn truncated(minimum: Float, maximum: Float, closed: bool) -> Cylinder {
        Cylinder { minimum, maximum, closed }
    }

    fn intersect_caps(&self, ray: &Ray, xs: &mut LocalHits) {
        if !self.closed || ray.direction.y.abs() < EPSILON {
            return;
        }
        for cap_y in [self.minimum, self.maximum].iter() {
            let t = (cap_y - ray.origin.y) / ray.direction.y;
            if check_cap(ray, t) {
                xs.push(LocalHit::new(t));
            }
        }
    }
}

fn check_cap(ray: &Ray, t: Float) -> bool {
    let x = ray.origin.x + t * ray.direction.x;
    let z = ray.origin.z + t * ray.direction.z;
    x * x + z * z <= 1.0
}

impl Default for Cylinder {
    fn default() -> Cylinder {
        Cylinder::new()
    }
}

impl Primitive for Cylinder {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut xs = LocalHits::new();

        let a = ray.direction.x * ray.direction.x + ray.direction.z * ray.direction.z;
        if a.abs() > EPSILON {
            let b = 2.0 * ray.origin.x * ray.direction.x + 2.0 * ray.origin.z * ray.direction.z;
            let c = ray.origin.x * ray.origin.x + ray.origin.z * ray.origin.z - 1.0;

            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
                return xs;
            }

            let sqrt_d = disc.sqrt();
            let mut t0 = (-b - sqrt_d) / (2.0 * a);
            let mut t1 = (-b + sqrt_d) / (2.0 * a);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            for t in [t0, t1].iter() {
                let y = ray.origin.y + t * ray.direction.y;
                if self.minimum < y && y < self.maximum {
                    xs.push(LocalHit::new(*t));
                }
            }
        }

        self.intersect_caps(ray, &mut xs);
        xs.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
        xs
    }

    fn local_normal_at(&self, point: Point3, _hit: &LocalHit) -> Vector3 {
        let dist = point.x * point.x + point.z * point.z;

        if dist < 1.0 && point.y >= self.maximum - EPSILON {
            Vector3::new(0.0, 1.0, 0.0)
        } else if dist < 1.0 && point.y <= self.minimum + EPSILON {
            Vector3::new(0.0, -1.0, 0.0)
        } else {
            Vector3::new(point.x, 0.0, point.z)
        }
    }

    fn bounds(&self) -> Bounds3 {
        Bounds3::new(
            Point3::new(-1.0, self.minimum, -1.0),
            Point3::new(1.0, self.maximum, 1.0),
        )
    }
}
