pub mod camera;
pub mod config;
pub mod error;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod tracer;
pub mod util;

pub use error::{Error, Result};
