//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, image and GIF errors, and provides semantic variants
//! for missing inputs, encoder failures and OCR failures.
use std::path::PathBuf;

use thiserror::Error;

use crate::types::OutputFormat;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("GIF encoding error: {0}")]
    Gif(#[from] gif::EncodingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Animation has no frames: {}", path.display())]
    EmptyAnimation { path: PathBuf },

    #[error("{format} encoding failed: {message}")]
    Encode {
        format: OutputFormat,
        message: String,
    },

    #[error("WebP decoding failed: {0}")]
    WebPDecode(String),

    #[error("OCR failed for {}: {message}", path.display())]
    Ocr { path: PathBuf, message: String },

    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub fn encode<E: std::fmt::Display>(format: OutputFormat, e: E) -> Self {
        Error::Encode {
            format,
            message: e.to_string(),
        }
    }
}
