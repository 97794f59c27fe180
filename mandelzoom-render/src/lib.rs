pub mod error;
pub mod export;
pub mod frame;
pub mod grid;
pub mod palette;
pub mod renderer;

pub use error::RenderError;
pub use export::{export_png, SnapshotInfo};
pub use frame::PixelBuffer;
pub use grid::EscapeGrid;
pub use palette::{
    ColorMapper, ColorScheme, HistogramEqualized, Monochrome, Palette, PaletteKind, Rgb, Smooth,
};
pub use renderer::Renderer;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
