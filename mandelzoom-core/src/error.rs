use thiserror::Error;

/// Errors originating from the core math types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid view state: {reason}")]
    InvalidView { reason: String },

    #[error("invalid surface geometry: {reason}")]
    InvalidSurface { reason: String },
}
