use super::common::Float;
use super::error::Error;
use super::geometry::{Point3, Ray};
use super::transform::Transform;

/// Pinhole camera. The view transform maps world space into camera space;
/// rays are cast through a canvas one unit in front of the eye.
#[derive(Debug, Copy, Clone)]
pub struct Camera {
    pub hsize: usize,
    pub vsize: usize,
    pub fov: Float,
    transform: Transform,
    pixel_size: Float,
    half_width: Float,
    half_height: Float,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, fov: Float) -> Result<Camera, Error> {
        if hsize == 0 || vsize == 0 {
            return Err(Error::InvalidCamera("image dimensions must be non-zero"));
        }
        if !(fov > 0.0 && fov < std::f64::consts::PI) {
            return Err(Error::InvalidCamera("field of view must lie in (0, pi)"));
        }

        let half_view = (fov / 2.0).tan();
        let aspect = hsize as Float / vsize as Float;
        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        Ok(Camera {
            hsize,
            vsize,
            fov,
            transform: Transform::identity(),
            pixel_size: (half_width * 2.0) / hsize as Float,
            half_width,
            half_height,
        })
    }

    pub fn set_transform(&mut self, transform: Transform) -> &mut Camera {
        self.transform = transform;
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn pixel_size(&self) -> Float {
        self.pixel_size
    }

    /// The world-space ray through a pixel coordinate. Coordinates are
    /// fractional: the caller supplies the sub-pixel offset, which is how
    /// jittered sampling plugs in.
    pub fn ray_for_pixel(&self, px: Float, py: Float) -> Ray {
        let x_offset = px * self.pixel_size;
        let y_offset = py * self.pixel_size;

        let world_x = self.half_width - x_offset;
        let world_y = self.half_height - y_offset;

        let inverse = self.transform.inverse();
        let pixel = inverse.transform_point(&Point3::new(world_x, world_y, -1.0));
        let origin = inverse.transform_point(&Point3::origin());
        let direction = (pixel - origin).normalize();

        Ray::new(origin, direction)
    }
}
