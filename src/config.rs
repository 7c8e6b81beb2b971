use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::{
    camera::Camera,
    error::{Error, Result},
    scene::{Scene, Sphere},
    tracer::{
        TracerConfig, DEFAULT_BACKGROUND, DEFAULT_BIAS, DEFAULT_INDEX_OF_REFRACTION,
        DEFAULT_MAX_DEPTH,
    },
};

/// JSON render description. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fov: f32,
    pub max_depth: u32,
    pub bias: f32,
    pub index_of_refraction: f32,
    pub background: [f32; 3],
    pub output_path: PathBuf,
    /// Falls back to the demo scene when absent.
    pub spheres: Option<Vec<SphereConfig>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            width: camera.width,
            height: camera.height,
            fov: camera.fov,
            max_depth: DEFAULT_MAX_DEPTH,
            bias: DEFAULT_BIAS,
            index_of_refraction: DEFAULT_INDEX_OF_REFRACTION,
            background: DEFAULT_BACKGROUND.to_array(),
            output_path: PathBuf::from("./spheres.ppm"),
            spheres: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SphereConfig {
    pub center: [f32; 3],
    pub radius: f32,
    pub surface_color: [f32; 3],
    #[serde(default)]
    pub reflectivity: f32,
    #[serde(default)]
    pub transparency: f32,
    #[serde(default)]
    pub emission_color: [f32; 3],
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("width and height must be positive"));
        }
        if !self.fov.is_finite() || self.fov <= 0.0 || self.fov >= 180.0 {
            return Err(invalid(format!(
                "fov must lie strictly between 0 and 180 degrees, got {}",
                self.fov
            )));
        }
        if !self.bias.is_finite() || self.bias < 0.0 {
            return Err(invalid(format!("bias must be finite and >= 0, got {}", self.bias)));
        }
        if !self.index_of_refraction.is_finite() || self.index_of_refraction <= 0.0 {
            return Err(invalid(format!(
                "indexOfRefraction must be finite and > 0, got {}",
                self.index_of_refraction
            )));
        }
        if !is_finite_vec3(self.background) {
            return Err(invalid("background components must be finite"));
        }
        if let Some(spheres) = &self.spheres {
            for (index, sphere) in spheres.iter().enumerate() {
                sphere.validate().map_err(|error| match error {
                    Error::InvalidSphere(reason) => {
                        Error::InvalidSphere(format!("#{index}: {reason}"))
                    }
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.width, self.height, self.fov)
    }

    pub fn tracer(&self) -> TracerConfig {
        TracerConfig {
            max_depth: self.max_depth,
            bias: self.bias,
            index_of_refraction: self.index_of_refraction,
            background: Vec3::from_array(self.background),
        }
    }

    pub fn scene(&self) -> Result<Scene> {
        match &self.spheres {
            Some(spheres) => spheres
                .iter()
                .cloned()
                .map(Sphere::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Scene::new),
            None => Ok(Scene::demo()),
        }
    }
}

impl SphereConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_finite_vec3(self.center) {
            return Err(Error::InvalidSphere("center components must be finite".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidSphere(format!(
                "radius must be finite and > 0, got {}",
                self.radius
            )));
        }
        validate_color(self.surface_color, "surfaceColor")?;
        if self.surface_color.iter().any(|&c| c > 1.0) {
            return Err(Error::InvalidSphere(format!(
                "surfaceColor components must lie in [0, 1], got ({}, {}, {})",
                self.surface_color[0], self.surface_color[1], self.surface_color[2]
            )));
        }
        validate_color(self.emission_color, "emissionColor")?;
        validate_unit(self.reflectivity, "reflectivity")?;
        validate_unit(self.transparency, "transparency")?;
        Ok(())
    }
}

impl TryFrom<SphereConfig> for Sphere {
    type Error = Error;

    fn try_from(config: SphereConfig) -> Result<Self> {
        config.validate()?;
        Ok(Sphere::new(
            Vec3::from_array(config.center),
            config.radius,
            Vec3::from_array(config.surface_color),
        )
        .with_reflectivity(config.reflectivity)
        .with_transparency(config.transparency)
        .with_emission(Vec3::from_array(config.emission_color)))
    }
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidConfig(reason.into())
}

fn is_finite_vec3(value: [f32; 3]) -> bool {
    value.iter().all(|c| c.is_finite())
}

fn validate_color(value: [f32; 3], field: &str) -> Result<()> {
    if !is_finite_vec3(value) || value.iter().any(|&c| c < 0.0) {
        return Err(Error::InvalidSphere(format!(
            "{field} components must be finite and >= 0, got ({}, {}, {})",
            value[0], value[1], value[2]
        )));
    }
    Ok(())
}

fn validate_unit(value: f32, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidSphere(format!(
            "{field} must lie in [0, 1], got {value}"
        )));
    }
    Ok(())
}
