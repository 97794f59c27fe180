use serde::{Deserialize, Serialize};

use mandelzoom_core::DEFAULT_THRESHOLD;
use mandelzoom_render::ColorScheme;

use crate::error::EngineError;
use crate::navigator::{DEFAULT_DEBOUNCE, DEFAULT_UNDO_GROWTH};

/// Engine tunables, all with working defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Escape-time iteration cap.
    pub threshold: u32,

    /// Selection-rectangle debounce, in milliseconds.
    pub debounce_ms: u64,

    /// Undo-stack capacity increment, in entries.
    pub undo_growth: usize,

    /// Worker-pool size; `None` means hardware concurrency.
    pub worker_count: Option<usize>,

    /// Coloring strategy.
    pub scheme: ColorScheme,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            undo_growth: DEFAULT_UNDO_GROWTH,
            worker_count: None,
            scheme: ColorScheme::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.threshold == 0 {
            return Err(EngineError::Config("threshold must be >= 1".into()));
        }
        if self.undo_growth == 0 {
            return Err(EngineError::Config("undo_growth must be >= 1".into()));
        }
        if self.worker_count == Some(0) {
            return Err(EngineError::Config(
                "worker_count override must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelzoom_render::PaletteKind;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.threshold, 1000);
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.undo_growth, 100);
        assert_eq!(config.worker_count, None);
    }

    #[test]
    fn rejects_zero_values() {
        let mut config = EngineConfig::default();
        config.threshold = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.undo_growth = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.worker_count = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"threshold": 8000}"#).unwrap();
        assert_eq!(config.threshold, 8000);
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.scheme, ColorScheme::default());
    }

    #[test]
    fn full_round_trip() {
        let config = EngineConfig {
            threshold: 800,
            debounce_ms: 50,
            undo_growth: 10,
            worker_count: Some(4),
            scheme: ColorScheme::Histogram(PaletteKind::HueWheelReversed),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
