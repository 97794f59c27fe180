use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid frame dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid worker count: {0} (must be >= 1)")]
    InvalidWorkerCount(usize),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] mandelzoom_core::CoreError),
}
