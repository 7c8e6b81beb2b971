use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed render config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    #[error("invalid sphere: {0}")]
    InvalidSphere(String),
}

pub type Result<T> = std::result::Result<T, Error>;
