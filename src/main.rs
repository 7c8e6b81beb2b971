use std::path::PathBuf;

use sphere_tracer_lib::{config::RenderConfig, renderer::Renderer, tracer::Tracer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading render config");
            RenderConfig::load(&path)?
        }
        None => RenderConfig::default(),
    };
    tracing::debug!(?config, "render config");

    let scene = config.scene()?;
    let renderer = Renderer::new(config.camera(), Tracer::new(config.tracer()));
    let frame = renderer.render(&scene);
    frame.save(&config.output_path)?;

    tracing::info!(path = %config.output_path.display(), "image written");
    Ok(())
}
