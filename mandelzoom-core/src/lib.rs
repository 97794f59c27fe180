pub mod complex;
pub mod error;
pub mod escape;
pub mod view;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use escape::{evaluate, normalized_escape_time, Escape, DEFAULT_THRESHOLD};
pub use view::{ScreenPoint, ViewState, WindowScale};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
