use thiserror::Error;

/// Errors surfaced to the windowing host.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] mandelzoom_core::CoreError),

    #[error(transparent)]
    Render(#[from] mandelzoom_render::RenderError),
}
