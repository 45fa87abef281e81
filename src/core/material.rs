use super::color::Color;
use super::common::Float;
use super::geometry::{Ray, Vector3};
use super::intersection::Computations;
use super::rng::Rng;
use super::sampling::{random_in_unit_sphere, random_unit_vector};

/// The closed set of surface interaction models. The set is small and
/// fixed, so a tagged enum with exhaustive matching replaces dynamic
/// dispatch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Material {
    /// Lambertian-ish scatterer.
    Diffuse { albedo: Color },
    /// Reflector with a fuzz factor blurring the mirror direction.
    Metal { albedo: Color, fuzz: Float },
    /// Transparent volume that refracts or reflects at its boundary.
    Dielectric { refractive_index: Float },
    /// Light source; terminal for any ray that reaches it.
    Emissive { emission: Color },
}

impl Material {
    pub fn diffuse(albedo: Color) -> Material {
        Material::Diffuse { albedo }
    }

    pub fn metal(albedo: Color, fuzz: Float) -> Material {
        Material::Metal { albedo, fuzz }
    }

    pub fn dielectric(refractive_index: Float) -> Material {
        Material::Dielectric { refractive_index }
    }

    pub fn emissive(emission: Color) -> Material {
        Material::Emissive { emission }
    }

    /// Light emitted by the surface itself.
    pub fn emitted(&self) -> Color {
        match self {
            Material::Emissive { emission } => *emission,
            _ => Color::BLACK,
        }
    }

    /// The index of refraction the volume behind this surface presents to
    /// the shading-context bookkeeping.
    pub fn refractive_index(&self) -> Float {
        match self {
            Material::Dielectric { refractive_index } => *refractive_index,
            _ => 1.0,
        }
    }

    /// Produce the scattered continuation ray and its attenuation, or
    /// `None` when the path terminates at this surface.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        comps: &Computations,
        rng: &mut Rng,
    ) -> Option<(Color, Ray)> {
        match self {
            Material::Diffuse { albedo } => {
                let mut direction = comps.normalv + random_unit_vector(rng);
                if direction.near_zero() {
                    direction = comps.normalv;
                }
                Some((*albedo, Ray::new(comps.over_point, direction)))
            }
            Material::Metal { albedo, fuzz } => {
                let direction = comps.reflectv + random_in_unit_sphere(rng) * *fuzz;
                Some((*albedo, Ray::new(comps.over_point, direction)))
            }
            Material::Dielectric { .. } => {
                // the context's (n1, n2) pair already accounts for nested
                // and exited volumes along the ray
                let ratio = comps.n1 / comps.n2;
                let unit_direction = ray_in.direction.normalize();
                let cos_theta = (-unit_direction).dot(&comps.normalv).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = ratio * sin_theta > 1.0;
                if cannot_refract || schlick_reflectance(cos_theta, ratio) > rng.uniform_float() {
                    let direction = unit_direction.reflect(&comps.normalv);
                    Some((Color::WHITE, Ray::new(comps.over_point, direction)))
                } else {
                    let direction = refract(&unit_direction, &comps.normalv, ratio);
                    Some((Color::WHITE, Ray::new(comps.under_point, direction)))
                }
            }
            Material::Emissive { .. } => None,
        }
    }
}

impl Default for Material {
    fn default() -> Material {
        Material::Diffuse { albedo: Color::WHITE }
    }
}

/// Refract a unit direction at a surface with the given ratio of refractive
/// indices. Callers must have ruled out total internal reflection.
pub fn refract(uv: &Vector3, normal: &Vector3, etai_over_etat: Float) -> Vector3 {
    let cos_theta = (-*uv).dot(normal).min(1.0);
    let r_out_perp = (*uv + *normal * cos_theta) * etai_over_etat;
    let r_out_parallel = *normal * -(1.0 - r_out_perp.length_squared()).abs().sqrt();
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for the reflected fraction at a dielectric
/// boundary.
pub fn schlick_reflectance(cosine: Float, ref_idx: Float) -> Float {
    let r0 = (1.0 - ref_idx) / (1.0 + ref_idx);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
