use crate::core::common::{consts::EPSILON, Float};
use crate::core::geometry::{Bounds3, Point3, Ray, Vector3};
use crate::core::shape::{LocalHit, LocalHits, Primitive};

/// Y-axis-aligned double-napped cone with its apex at the origin. The
/// radius at height y equals |y|.
#[derive(Debug, Copy, Clone)]
pub struct Cone {
    pub minimum: Float,
    pub maximum: Float,
    pub closed: bool,
}

impl Cone {
    pub fn new() -> Cone {
        Cone {
            minimum: Float::NEG_INFINITY,
            maximum: Float::INFINITY,
            closed: false,
        }
    }

    pub fn truncated(minimum: Float, maximum: Float, closed: bool) -> Cone {
        Cone { minimum, maximum, closed }
    }

    fn intersect_caps(&self, ray: &Ray, xs: &mut LocalHits) {
        if !self.closed || ray.direction.y.abs() < EPSILON {
            return;
        }
        for cap_y in [self.minimum, self.maximum].iter() {
            let t = (cap_y - ray.origin.y) / ray.direction.y;
            if check_cap(ray, t, cap_y.abs()) {
                xs.push(LocalHit::new(t));
            }
        }
    }
}

fn check_cap(ray: &Ray, t: Float, radius: Float) -> bool {
    let x = ray.origin.x + t * ray.direction.x;
    let z = ray.origin.z + t * ray.direction.z;
    x * x + z * z <= radius * radius
}

impl Default for Cone {
    fn default() -> Cone {
        Cone::new()
    }
}

impl Primitive for Cone {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut xs = LocalHits::new();

        let d = ray.direction;
        let o = ray.origin;
        let a = d.x * d.x - d.y * d.y + d.z * d.z;
        let b = 2.0 * (o.x * d.x - o.y * d.y + o.z * d.z);
        let c = o.x * o.x - o.y * o.y + o.z * o.z;

        if a.abs() < EPSILON {
            // ray parallel to one nappe, can still cross the other
            if b.abs() > EPSILON {
                let t = -c / (2.0 * b);
                let y = o.y + t * d.y;
                if self.minimum < y && y < self.maximum {
                    xs.push(LocalHit::new(t));
                }
            }
        } else {
            let disc = b * b - 4.0 * a * c;
            if disc >= 0.0 {
                let sqrt_d = disc.sqrt();
                let mut t0 = (-b - sqrt_d) / (2.0 * a);
                let mut t1 = (-b + sqrt_d) / (2.0 * a);
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                for t in [t0, t1].iter() {
                    let y = o.y + t * d.y;
                    if self.minimum < y && y < self.maximum {
                        xs.push(LocalHit::new(*t));
                    }
                }
            }
        }

        self.intersect_caps(ray, &mut xs);
        xs.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
        xs
    }

    fn local_normal_at(&self, point: Point3, _hit: &LocalHit) -> Vector3 {
        let dist = point.x * point.x + point.z * point.z;

        if self.closed && dist < self.maximum * self.maximum && point.y >= self.maximum - EPSILON {
            return Vector3::new(0.0, 1.0, 0.0);
        }
        if self.closed && dist < self.minimum * self.minimum && point.y <= self.minimum + EPSILON {
            return Vector3::new(0.0, -1.0, 0.0);
        }

        let mut y = dist.sqrt();
        if point.y > 0.0 {
            y = -y;
        }
        Vector3::new(point.x, y, point.z)
    }

    fn bounds(&self) -> Bounds3 {
        let limit = self.minimum.abs().max(self.maximum.abs());
        Bounds3::new(
            Point3::new(-limit, self.minimum, -limit),
            Point3::new(limit, self.maximum, limit),
        )
    }
}
