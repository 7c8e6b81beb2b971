use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use glam::Vec3;
use image::RgbImage;
use rayon::prelude::*;

use crate::{
    camera::Camera,
    error::Result,
    scene::Scene,
    tracer::{TraceStats, Tracer},
};

/// Unclamped colors of a rendered image, row-major, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
        debug_assert!(x < self.width() && y < self.height());
        self.pixels[y as usize * self.width() as usize + x as usize]
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            image::Rgb(convert_rgb(self.pixel(x, y)))
        })
    }

    /// Binary PPM (`P6`) with an 8-bit max value.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width(), self.height())?;
        writer.write_all(self.to_rgb_image().as_raw())?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a PPM for `.ppm` paths, otherwise lets `image` pick the encoder.
    pub fn save(&self, path: &Path) -> Result<()> {
        let is_ppm = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));
        if is_ppm {
            self.write_ppm(BufWriter::new(File::create(path)?))
        } else {
            self.to_rgb_image().save(path)?;
            Ok(())
        }
    }
}

/// Clamp each channel to `[0, 1]` and scale to a byte.
pub fn convert_rgb(color: Vec3) -> [u8; 3] {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u8;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u8;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u8;
    [r, g, b]
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub camera: Camera,
    pub tracer: Tracer,
}

impl Renderer {
    pub fn new(camera: Camera, tracer: Tracer) -> Self {
        Self { camera, tracer }
    }

    /// Trace one primary ray per pixel, rows spread over the rayon pool.
    pub fn render(&self, scene: &Scene) -> Frame {
        let started = Instant::now();
        let mut frame = Frame::new(self.camera.width, self.camera.height);
        let width = self.camera.width as usize;
        if width == 0 || self.camera.height == 0 {
            return frame;
        }

        let stats = frame
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| {
                let mut stats = TraceStats::default();
                for (x, slot) in row.iter_mut().enumerate() {
                    let ray = self.camera.primary_ray(x as u32, y as u32);
                    let color = self.tracer.trace_with_stats(&ray, scene, 0, &mut stats);
                    if !color.is_finite() {
                        tracing::warn!(x, y, ?color, "non-finite pixel, writing black");
                        *slot = Vec3::ZERO;
                    } else {
                        *slot = color;
                    }
                }
                stats
            })
            .reduce(TraceStats::default, TraceStats::merge);

        tracing::info!(
            width = self.camera.width,
            height = self.camera.height,
            spheres = scene.spheres.len(),
            rays = stats.rays,
            shadow_rays = stats.shadow_rays,
            deepest = stats.deepest,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "frame rendered"
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scene::Sphere, tracer::TracerConfig};

    #[test]
    fn convert_rgb_clamps_and_truncates() {
        assert_eq!(convert_rgb(Vec3::new(2.0, -1.0, 0.5)), [255, 0, 127]);
    }

    #[test]
    fn ppm_layout() {
        let mut frame = Frame::new(2, 1);
        frame.pixels[0] = Vec3::new(1.0, 0.0, 0.0);
        frame.pixels[1] = Vec3::new(0.0, 0.0, 3.0);

        let mut bytes = Vec::new();
        frame.write_ppm(&mut bytes).unwrap();

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[255, 0, 0, 0, 0, 255]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn pixel_rejects_column_past_width() {
        let frame = Frame::new(2, 2);
        // Would alias (0, 1) without the bounds check.
        frame.pixel(2, 0);
    }

    #[test]
    fn empty_scene_renders_background() {
        let tracer = Tracer::new(TracerConfig {
            background: Vec3::new(0.0, 0.5, 1.0),
            ..Default::default()
        });
        let renderer = Renderer::new(Camera::new(4, 3, 30.0), tracer);
        let frame = renderer.render(&Scene::default());
        assert_eq!(frame.pixels().len(), 12);
        assert!(frame.pixels().iter().all(|&c| c == Vec3::new(0.0, 0.5, 1.0)));
    }

    #[test]
    fn rows_are_ordered_top_to_bottom() {
        // A sphere filling only the upper half of the view.
        let scene = Scene::new(vec![Sphere::new(
            Vec3::new(0.0, 50.0, -100.0),
            50.0,
            Vec3::ONE,
        )
        .with_emission(Vec3::new(1.0, 0.0, 0.0))]);
        let tracer = Tracer::new(TracerConfig {
            background: Vec3::ZERO,
            ..Default::default()
        });
        let frame = Renderer::new(Camera::new(8, 8, 30.0), tracer).render(&scene);
        assert_eq!(frame.pixel(4, 0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(frame.pixel(4, 7), Vec3::ZERO);
    }
}
