//! Recursive Whitted-style shading of rays against a sphere scene.

use glam::Vec3;

use crate::{
    ray::Ray,
    scene::{Scene, Sphere},
    util::math::{mix, normalized, reflect, refract},
};

pub const DEFAULT_MAX_DEPTH: u32 = 5;
pub const DEFAULT_BIAS: f32 = 1e-4;
pub const DEFAULT_INDEX_OF_REFRACTION: f32 = 1.1;
pub const DEFAULT_BACKGROUND: Vec3 = Vec3::ONE;

/// Share of reflection kept even when looking straight at a surface.
pub const FRESNEL_BIAS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerConfig {
    /// Depth at which reflective and transparent surfaces are shaded as diffuse.
    pub max_depth: u32,
    /// Offset along the normal applied to secondary ray origins.
    pub bias: f32,
    pub index_of_refraction: f32,
    /// Returned for rays that hit nothing.
    pub background: Vec3,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            bias: DEFAULT_BIAS,
            index_of_refraction: DEFAULT_INDEX_OF_REFRACTION,
            background: DEFAULT_BACKGROUND,
        }
    }
}

/// Counters collected while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub rays: u64,
    pub shadow_rays: u64,
    pub diffuse_shades: u64,
    pub deepest: u32,
}

impl TraceStats {
    pub fn merge(self, other: Self) -> Self {
        Self {
            rays: self.rays + other.rays,
            shadow_rays: self.shadow_rays + other.shadow_rays,
            diffuse_shades: self.diffuse_shades + other.diffuse_shades,
            deepest: self.deepest.max(other.deepest),
        }
    }
}

/// Reflected share of light for a given `facing_ratio` (`-D·N`).
///
/// Grows as the view approaches grazing incidence.
pub fn fresnel(facing_ratio: f32) -> f32 {
    mix((1.0 - facing_ratio).powi(3), 1.0, FRESNEL_BIAS)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer {
    config: TracerConfig,
}

impl Tracer {
    pub fn new(config: TracerConfig) -> Self {
        Self { config }
    }

    /// Color seen along `ray`. Primary rays start at depth 0.
    pub fn trace(&self, ray: &Ray, scene: &Scene, depth: u32) -> Vec3 {
        self.trace_with_stats(ray, scene, depth, &mut TraceStats::default())
    }

    pub fn trace_with_stats(
        &self,
        ray: &Ray,
        scene: &Scene,
        depth: u32,
        stats: &mut TraceStats,
    ) -> Vec3 {
        stats.rays += 1;
        stats.deepest = stats.deepest.max(depth);

        let Some((index, sphere, t_near)) = nearest_hit(scene, ray) else {
            return self.config.background;
        };

        let point = ray.at(t_near);
        let mut normal = normalized(point - sphere.center());
        let mut inside = false;
        if ray.direction.dot(normal) > 0.0 {
            normal = -normal;
            inside = true;
        }

        let hit = SurfaceHit {
            index,
            sphere,
            point,
            normal,
            inside,
        };
        let glossy = sphere.reflectivity() > 0.0 || sphere.transparency() > 0.0;
        let surface = if glossy && depth < self.config.max_depth {
            self.shade_glossy(ray, scene, depth, &hit, stats)
        } else {
            self.shade_diffuse(scene, &hit, stats)
        };

        surface + sphere.emission_color()
    }

    fn shade_glossy(
        &self,
        ray: &Ray,
        scene: &Scene,
        depth: u32,
        hit: &SurfaceHit<'_>,
        stats: &mut TraceStats,
    ) -> Vec3 {
        let SurfaceHit {
            sphere,
            point,
            normal,
            inside,
            ..
        } = *hit;
        let bias = self.config.bias;
        let mut reflect_weight = fresnel(-ray.direction.dot(normal));

        let reflect_ray = Ray::new(
            point + normal * bias,
            normalized(reflect(ray.direction, normal)),
        );
        let reflection = self.trace_with_stats(&reflect_ray, scene, depth + 1, stats);

        let mut refraction = Vec3::ZERO;
        if sphere.transparency() > 0.0 {
            let ior = self.config.index_of_refraction;
            let eta = if inside { ior } else { 1.0 / ior };
            match refract(ray.direction, normal, eta) {
                Some(direction) => {
                    let refract_ray = Ray::new(point - normal * bias, normalized(direction));
                    refraction = self.trace_with_stats(&refract_ray, scene, depth + 1, stats);
                }
                // Total internal reflection: everything is reflected.
                None => reflect_weight = 1.0,
            }
        }

        let transmitted = refraction * (1.0 - reflect_weight) * sphere.transparency();
        (reflection * reflect_weight + transmitted) * sphere.surface_color()
    }

    fn shade_diffuse(&self, scene: &Scene, hit: &SurfaceHit<'_>, stats: &mut TraceStats) -> Vec3 {
        stats.diffuse_shades += 1;

        let SurfaceHit {
            index: hit_index,
            sphere,
            point,
            normal,
            ..
        } = *hit;

        let shadow_origin = point + normal * self.config.bias;
        let mut color = Vec3::ZERO;
        for (light_index, light) in scene.lights() {
            if light_index == hit_index {
                continue;
            }

            let light_dir = normalized(light.center() - point);
            let shadow_ray = Ray::new(shadow_origin, light_dir);
            stats.shadow_rays += 1;
            let occluded = scene
                .spheres
                .iter()
                .enumerate()
                .any(|(j, other)| j != light_index && other.intersect(&shadow_ray).is_some());
            if occluded {
                continue;
            }

            let lambert = normal.dot(light_dir).max(0.0);
            color += sphere.surface_color() * lambert * light.emission_color();
        }
        color
    }
}

/// Local geometry at the nearest hit. `normal` faces the incoming ray.
#[derive(Clone, Copy)]
struct SurfaceHit<'s> {
    index: usize,
    sphere: &'s Sphere,
    point: Vec3,
    normal: Vec3,
    inside: bool,
}

/// Closest sphere along `ray`, with its index and hit distance.
fn nearest_hit<'s>(scene: &'s Scene, ray: &Ray) -> Option<(usize, &'s Sphere, f32)> {
    let mut t_near = f32::INFINITY;
    let mut nearest = None;
    for (index, sphere) in scene.spheres.iter().enumerate() {
        if let Some(hit) = sphere.intersect(ray) {
            let t = hit.nearest();
            if t < t_near {
                t_near = t;
                nearest = Some((index, sphere));
            }
        }
    }
    nearest.map(|(index, sphere)| (index, sphere, t_near))
}
