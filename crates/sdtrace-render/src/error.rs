//! Errors from the compute backend

use sdtrace_sdf::PackError;
use thiserror::Error;

/// Errors that can occur while rendering on the GPU
#[derive(Error, Debug)]
pub enum RenderError {
    /// No adapter matched the request
    #[error("No suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device
    #[error("Failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// Output buffer could not be mapped for readback
    #[error("Failed to read back output: {0}")]
    BufferMap(String),

    /// Scene does not fit the wire format
    #[error(transparent)]
    Pack(#[from] PackError),

    /// Requested frame cannot be produced on this device
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}
