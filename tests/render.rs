// tests/render.rs
//
// End-to-end checks: camera -> tracer -> frame -> encoded image.

use glam::Vec3;
use sphere_tracer_lib::{
    camera::Camera,
    config::RenderConfig,
    renderer::Renderer,
    scene::{Scene, Sphere},
    tracer::{Tracer, TracerConfig},
};

fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

/// Red unit sphere in front of the camera, light behind the camera on the same axis.
fn red_sphere_scene() -> Scene {
    Scene::new(vec![
        Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Vec3::new(1.0, 0.0, 0.0)),
        Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, Vec3::ZERO).with_emission(Vec3::splat(3.0)),
    ])
}

/// Lambert term at the first hit of a camera ray with the red sphere.
fn expected_red(direction: Vec3) -> f32 {
    let center = Vec3::new(0.0, 0.0, -5.0);
    let light = Vec3::new(0.0, 0.0, 10.0);
    // |t*d - c|^2 = 1 with |d| = 1
    let b = direction.dot(center);
    let t = b - (b * b - center.dot(center) + 1.0).sqrt();
    let point = direction * t;
    let normal = (point - center).normalize();
    let to_light = (light - point).normalize();
    3.0 * normal.dot(to_light).max(0.0)
}

#[test]
fn lit_sphere_matches_closed_form() {
    let camera = Camera::new(9, 9, 30.0);
    let tracer = Tracer::new(TracerConfig {
        background: Vec3::ZERO,
        ..Default::default()
    });
    let frame = Renderer::new(camera, tracer).render(&red_sphere_scene());

    let center = frame.pixel(4, 4);
    assert!(approx_eq(center.x, 3.0, 1e-4), "got {center:?}");
    assert_eq!((center.y, center.z), (0.0, 0.0));

    for (x, y) in [(5, 4), (4, 3), (5, 5)] {
        let direction = camera.primary_ray(x, y).direction;
        let pixel = frame.pixel(x, y);
        assert!(
            approx_eq(pixel.x, expected_red(direction), 1e-4),
            "pixel ({x}, {y}) = {pixel:?}"
        );
    }

    // Corners look past the sphere.
    assert_eq!(frame.pixel(0, 0), Vec3::ZERO);

    let rgb = frame.to_rgb_image();
    assert_eq!(rgb.get_pixel(4, 4).0, [255, 0, 0]);
}

#[test]
fn demo_scene_renders_finite_colors() {
    let config = RenderConfig {
        width: 32,
        height: 24,
        ..Default::default()
    };
    let renderer = Renderer::new(config.camera(), Tracer::new(config.tracer()));
    let frame = renderer.render(&config.scene().unwrap());

    assert_eq!(frame.pixels().len(), 32 * 24);
    assert!(frame.pixels().iter().all(|c| c.is_finite()));
    // The glass sphere sits in the middle of the view.
    assert_ne!(frame.pixel(16, 12), config.tracer().background);
}

#[test]
fn saves_binary_ppm() {
    let path = std::env::temp_dir().join("sphere_tracer_saves_binary_ppm.ppm");
    let renderer = Renderer::new(Camera::new(5, 3, 30.0), Tracer::default());
    renderer.render(&red_sphere_scene()).save(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let header = b"P6\n5 3\n255\n";
    assert_eq!(&bytes[..header.len()], header);
    assert_eq!(bytes.len(), header.len() + 5 * 3 * 3);
    std::fs::remove_file(&path).unwrap();
}
