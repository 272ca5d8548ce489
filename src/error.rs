//! Errors raised outside of the tracing core.
//!
//! Shading itself never fails; only reading scene descriptions and writing
//! images can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("Sphere {index} uses undefined material \"{name}\"")]
    UnknownMaterial { index: usize, name: String },

    #[error("Unsupported output format for {0:?}; use .png or .ppm")]
    UnsupportedFormat(PathBuf),

    #[error("Render worker {0} panicked")]
    WorkerPanicked(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
