pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod navigator;

pub use config::EngineConfig;
pub use engine::{Engine, PointerEvent};
pub use error::EngineError;
pub use input::{ChordTracker, Key};
pub use navigator::{SelectionRect, UndoStack, ZoomNavigator};

/// Convenience result type for the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
