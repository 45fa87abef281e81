use super::{Point3, Vector3};
use crate::core::common::Float;
use std::fmt;

/// A ray in the space of whichever node it is currently being tested against.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Ray {
        Ray { origin, direction }
    }

    /// Return the point at parameter `t` along the ray.
    #[inline]
    pub fn position(&self, t: Float) -> Point3 {
        self.origin + self.direction * t
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[origin={}, direction={}]", self.origin, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computing_a_point_from_a_distance() {
        let r = Ray::new(Point3::new(2.0, 3.0, 4.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(r.position(0.0), Point3::new(2.0, 3.0, 4.0));
        assert_eq!(r.position(1.0), Point3::new(3.0, 3.0, 4.0));
        assert_eq!(r.position(-1.0), Point3::new(1.0, 3.0, 4.0));
        assert_eq!(r.position(2.5), Point3::new(4.5, 3.0, 4.0));
    }
}
