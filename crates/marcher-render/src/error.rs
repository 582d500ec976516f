//! Error types for the render layer

use thiserror::Error;

/// Result type alias using the render layer's Error type
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while setting up or running the pass
#[derive(Error, Debug)]
pub enum RenderError {
    /// No adapter matched the request
    #[error("No suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device
    #[error("Failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// Source and destination differ in size
    #[error("Source is {source_size:?} but destination is {destination_size:?}")]
    TargetSizeMismatch {
        source_size: (u32, u32),
        destination_size: (u32, u32),
    },

    /// A target's format is not the one the operation needs
    #[error("Expected format {expected:?}, got {actual:?}")]
    TargetFormatMismatch {
        expected: wgpu::TextureFormat,
        actual: wgpu::TextureFormat,
    },

    /// The evaluator program failed validation
    #[error("Evaluator rejected: {0}")]
    EvaluatorRejected(String),

    /// Reading a texture back to the CPU failed
    #[error("Readback failed: {0}")]
    Readback(String),
}
