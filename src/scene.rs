use glam::Vec3;

use crate::ray::Ray;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Emissive spheres, paired with their index in the scene.
    pub fn lights(&self) -> impl Iterator<Item = (usize, &Sphere)> {
        self.spheres
            .iter()
            .enumerate()
            .filter(|(_, sphere)| sphere.is_light())
    }

    /// Ground, five glossy spheres and a single overhead light.
    pub fn demo() -> Self {
        Self::new(vec![
            Sphere::new(Vec3::new(0.0, -10004.0, -20.0), 10000.0, Vec3::splat(0.2)),
            Sphere::new(Vec3::new(0.0, 0.0, -20.0), 4.0, Vec3::new(1.0, 0.32, 0.36))
                .with_reflectivity(1.0)
                .with_transparency(0.5),
            Sphere::new(Vec3::new(4.0, -1.0, -15.0), 2.0, Vec3::new(0.5, 0.86, 0.46))
                .with_reflectivity(1.0),
            Sphere::new(Vec3::new(4.0, 0.0, -25.0), 3.0, Vec3::new(0.1, 0.1, 0.97))
                .with_reflectivity(1.0),
            Sphere::new(Vec3::new(-5.5, 0.0, -20.0), 3.0, Vec3::splat(0.85))
                .with_reflectivity(1.0),
            Sphere::new(Vec3::new(0.0, 20.0, -15.0), 3.0, Vec3::ZERO)
                .with_emission(Vec3::splat(3.0)),
        ])
    }
}

/// Parametric distances where a ray's line crosses a sphere, `t0 <= t1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub t0: f32,
    pub t1: f32,
}

impl Intersection {
    /// First crossing in front of the origin, falling back to the exit point
    /// when the origin is inside the sphere.
    pub fn nearest(&self) -> f32 {
        if self.t0 < 0.0 {
            self.t1
        } else {
            self.t0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    radius2: f32,

    surface_color: Vec3,
    emission_color: Vec3,
    transparency: f32,
    reflectivity: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.5, Vec3::ONE)
    }
}

impl Sphere {
    /// Opaque, non-reflective, non-emissive sphere.
    pub fn new(center: Vec3, radius: f32, surface_color: Vec3) -> Self {
        Self {
            center,
            radius,
            radius2: radius * radius,
            surface_color,
            emission_color: Vec3::ZERO,
            transparency: 0.0,
            reflectivity: 0.0,
        }
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_emission(mut self, emission_color: Vec3) -> Self {
        self.emission_color = emission_color;
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn surface_color(&self) -> Vec3 {
        self.surface_color
    }

    pub fn emission_color(&self) -> Vec3 {
        self.emission_color
    }

    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    pub fn reflectivity(&self) -> f32 {
        self.reflectivity
    }

    pub fn is_light(&self) -> bool {
        self.emission_color.max_element() > 0.0
    }

    /// Geometric ray/sphere test.
    ///
    /// `ray.direction` must be normalized: the distances are measured in units
    /// of its length. A sphere whose center projects behind the origin is
    /// reported as missed, even if the origin lies inside it.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let l = self.center - ray.origin;
        let tca = l.dot(ray.direction);
        if tca < 0.0 {
            return None;
        }
        let d2 = l.dot(l) - tca * tca;
        if d2 > self.radius2 {
            return None;
        }
        let thc = (self.radius2 - d2).sqrt();
        Some(Intersection {
            t0: tca - thc,
            t1: tca + thc,
        })
    }
}
