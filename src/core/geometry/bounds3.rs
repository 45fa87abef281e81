use super::{Point3, Ray};
use crate::core::common::{consts::EPSILON, Float};
use std::fmt;

/// Axis-aligned bounding box. A box is always expressed in the local space
/// of the node that owns it, before that node's own transform is applied.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3 {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds3 {
    pub fn new(min: Point3, max: Point3) -> Bounds3 {
        Bounds3 { min, max }
    }

    /// An empty box, with the corners inverted so that any added point
    /// becomes both corners.
    pub fn empty() -> Bounds3 {
        Bounds3 {
            min: Point3::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
            max: Point3::new(Float::NEG_INFINITY, Float::NEG_INFINITY, Float::NEG_INFINITY),
        }
    }

    /// A box containing everything.
    pub fn infinite() -> Bounds3 {
        Bounds3 {
            min: Point3::new(Float::NEG_INFINITY, Float::NEG_INFINITY, Float::NEG_INFINITY),
            max: Point3::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Grow the box to contain the given point.
    pub fn add_point(&mut self, p: Point3) {
        if p.x < self.min.x {
            self.min.x = p.x;
        }
        if p.y < self.min.y {
            self.min.y = p.y;
        }
        if p.z < self.min.z {
            self.min.z = p.z;
        }
        if p.x > self.max.x {
            self.max.x = p.x;
        }
        if p.y > self.max.y {
            self.max.y = p.y;
        }
        if p.z > self.max.z {
            self.max.z = p.z;
        }
    }

    /// Grow the box to contain another box.
    pub fn union(&mut self, other: &Bounds3) {
        self.add_point(other.min);
        self.add_point(other.max);
    }

    pub fn contains_point(&self, p: Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn contains_bounds(&self, other: &Bounds3) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    pub fn centroid(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Index of the axis along which the box is widest.
    pub fn longest_axis(&self) -> usize {
        let dx = self.max.x - self.min.x;
        let dy = self.max.y - self.min.y;
        let dz = self.max.z - self.min.z;
        if dx >= dy && dx >= dz {
            0
        } else if dy >= dz {
            1
        } else {
            2
        }
    }

    /// Split the box into two halves at the midpoint of its longest axis.
    pub fn split(&self) -> (Bounds3, Bounds3) {
        let axis = self.longest_axis();
        let mid = self.centroid()[axis];
        let mut left = *self;
        let mut right = *self;
        match axis {
            0 => {
                left.max.x = mid;
                right.min.x = mid;
            }
            1 => {
                left.max.y = mid;
                right.min.y = mid;
            }
            _ => {
                left.max.z = mid;
                right.min.z = mid;
            }
        }
        (left, right)
    }

    /// Slab test against a ray in the same space as the box.
    ///
    /// NaNs produced by degenerate axes (0 · ∞) drop out of the min/max
    /// chains, which errs on the side of reporting a hit.
    pub fn intersects(&self, ray: &Ray) -> bool {
        let (xtmin, xtmax) = check_axis(ray.origin.x, ray.direction.x, self.min.x, self.max.x);
        let (ytmin, ytmax) = check_axis(ray.origin.y, ray.direction.y, self.min.y, self.max.y);
        let (ztmin, ztmax) = check_axis(ray.origin.z, ray.direction.z, self.min.z, self.max.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        tmin <= tmax
    }
}

fn check_axis(origin: Float, direction: Float, min: Float, max: Float) -> (Float, Float) {
    let tmin_numerator = min - origin;
    let tmax_numerator = max - origin;

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

impl Default for Bounds3 {
    fn default() -> Bounds3 {
        Bounds3::empty()
    }
}

impl fmt::Display for Bounds3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
