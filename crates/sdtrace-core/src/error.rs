//! Error types for sdtrace

use thiserror::Error;

/// Result type alias using sdtrace's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building scenes or rendering on the CPU
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Settings file could not be decoded
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Worker pool for the parallel path could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
