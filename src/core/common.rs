//! Type definitions and constants shared across the crate.

/// All scene arithmetic runs in double precision.
pub type Float = f64;

pub mod consts {
    use super::Float;
    pub use std::f64::consts::*;

    /// Tolerance used for surface tests and approximate comparisons.
    pub const EPSILON: Float = 1e-5;
    /// Offset applied along the normal when spawning secondary rays, to
    /// avoid re-intersecting the surface they originate from.
    pub const SURFACE_OFFSET: Float = EPSILON / 2.0;
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(t: Float, a: Float, b: Float) -> Float {
    a * (1.0 - t) + b * t
}

/// Convert an angle from degrees into radians.
pub fn radians(deg: Float) -> Float {
    deg * consts::PI / 180.0
}

/// Convert an angle from radians into degrees.
pub fn degrees(rad: Float) -> Float {
    rad * 180.0 / consts::PI
}

/// Test whether two values differ by less than the given tolerance.
#[inline]
pub fn within_tolerance(a: Float, b: Float, tolerance: Float) -> bool {
    (a - b).abs() < tolerance
}

/// Approximate equality at the crate-wide tolerance.
#[inline]
pub fn approx_eq(a: Float, b: Float) -> bool {
    within_tolerance(a, b, consts::EPSILON)
}
