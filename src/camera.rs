use glam::Vec3;

use crate::{
    ray::Ray,
    util::math::{degree_to_radian, normalized},
};

/// Pinhole camera at the world origin looking down `-z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view, in degrees.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov: 30.0,
        }
    }
}

impl Camera {
    pub fn new(width: u32, height: u32, fov: f32) -> Self {
        Self { width, height, fov }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Ray through the center of pixel `(x, y)`, row 0 at the top.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let angle = (degree_to_radian(self.fov) * 0.5).tan();
        let xx = (2.0 * ((x as f32 + 0.5) / self.width as f32) - 1.0) * angle * self.aspect();
        let yy = (1.0 - 2.0 * ((y as f32 + 0.5) / self.height as f32)) * angle;
        Ray::new(Vec3::ZERO, normalized(Vec3::new(xx, yy, -1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pixel_looks_down_negative_z() {
        let camera = Camera::new(3, 3, 30.0);
        let ray = camera.primary_ray(1, 1);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn corners_point_outwards() {
        let camera = Camera::new(640, 480, 30.0);
        let top_left = camera.primary_ray(0, 0).direction;
        let bottom_right = camera.primary_ray(639, 479).direction;
        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
        assert!((top_left.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn edge_pixel_matches_field_of_view() {
        let camera = Camera::new(2, 2, 90.0);
        // Half a pixel from the top edge: y' = 0.5 * tan(45°).
        let d = camera.primary_ray(0, 0).direction;
        assert!((d.y / -d.z - 0.5).abs() < 1e-5);
        assert!((d.x / -d.z + 0.5).abs() < 1e-5);
    }
}
