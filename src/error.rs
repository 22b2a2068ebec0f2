use thiserror::Error;

pub type Result<T> = std::result::Result<T, VitrineError>;

#[derive(Debug, Error)]
pub enum VitrineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid name: {0}")]
    InvalidName(String),
}
