use super::color::Color;
use super::geometry::Point3;

/// A dimensionless light source. Immutable once added to a world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Point3,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Point3, intensity: Color) -> PointLight {
        PointLight { position, intensity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_point_light_has_a_position_and_intensity() {
        let light = PointLight::new(Point3::origin(), Color::WHITE);
        assert_eq!(light.position, Point3::origin());
        assert_eq!(light.intensity, Color::WHITE);
    }
}
