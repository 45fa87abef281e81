use super::geometry::Vector3;
use super::rng::Rng;

/// A uniformly distributed point inside the unit sphere, by rejection.
pub fn random_in_unit_sphere(rng: &mut Rng) -> Vector3 {
    loop {
        let v = Vector3::new(
            rng.uniform_in_range(-1.0, 1.0),
            rng.uniform_in_range(-1.0, 1.0),
            rng.uniform_in_range(-1.0, 1.0),
        );
        if v.length_squared() < 1.0 {
            return v;
        }
    }
}

/// A uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut Rng) -> Vector3 {
    random_in_unit_sphere(rng).normalize()
}

/// A random direction in the hemisphere around the given normal.
pub fn random_in_hemisphere(rng: &mut Rng, normal: &Vector3) -> Vector3 {
    let v = random_in_unit_sphere(rng);
    if v.dot(normal) > 0.0 {
        v
    } else {
        -v
    }
}
