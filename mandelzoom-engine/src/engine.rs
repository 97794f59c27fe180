use std::fmt::Write as _;
use std::time::{Duration, Instant};

use tracing::debug;

use mandelzoom_core::{ViewState, WindowScale};
use mandelzoom_render::{PixelBuffer, Renderer};

use crate::config::EngineConfig;
use crate::input::{ChordTracker, Key};
use crate::navigator::{SelectionRect, ZoomNavigator};

/// A discrete pointer event, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Moved { x: f64, y: f64 },
    Up { x: f64, y: f64 },
}

/// The host-facing engine: navigation state plus the rendering pipeline.
///
/// The host owns the window, the event loop, and presentation; it feeds
/// events in, asks whether a re-render is due, and calls
/// [`render_frame`](Self::render_frame). Everything here runs on the
/// host's single input thread, so a frame always reads a settled view.
pub struct Engine {
    navigator: ZoomNavigator,
    chord: ChordTracker,
    window: WindowScale,
    renderer: Renderer,
    threshold: u32,
    scheme: mandelzoom_render::ColorScheme,
}

impl Engine {
    /// Build the engine for a screen/window geometry.
    ///
    /// Worker-pool or buffer-allocation failures come back as errors; the
    /// host should treat them as fatal at startup rather than limp along.
    pub fn new(
        config: EngineConfig,
        screen_w: u32,
        screen_h: u32,
        window_w: u32,
        window_h: u32,
    ) -> crate::Result<Self> {
        config.validate()?;
        let view = ViewState::initial(screen_w, screen_h)?;
        let window = WindowScale::new(screen_w, screen_h, window_w, window_h)?;
        let renderer = Renderer::new(screen_w, screen_h, config.worker_count)?;
        let navigator = ZoomNavigator::new(
            view,
            screen_w,
            screen_h,
            Duration::from_millis(config.debounce_ms),
            config.undo_growth,
        );
        debug!(
            screen_w,
            screen_h,
            window_w,
            window_h,
            threshold = config.threshold,
            workers = renderer.worker_count(),
            "engine initialized"
        );
        Ok(Self {
            navigator,
            chord: ChordTracker::new(),
            window,
            renderer,
            threshold: config.threshold,
            scheme: config.scheme,
        })
    }

    pub fn view(&self) -> ViewState {
        self.navigator.view()
    }

    /// Feed one pointer event; returns whether a re-render is required.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        let now = Instant::now();
        match event {
            PointerEvent::Down { x, y } => {
                self.navigator
                    .begin_selection(self.window.to_screen(x, y), now);
                false
            }
            PointerEvent::Moved { x, y } => {
                self.navigator.cursor_move(self.window.to_screen(x, y), now);
                false
            }
            PointerEvent::Up { .. } => self.navigator.commit(),
        }
    }

    /// Feed one key transition; returns whether a re-render is required
    /// (true exactly when the undo chord fired and the stack was
    /// non-empty).
    pub fn handle_key_event(&mut self, key: Key, pressed: bool) -> bool {
        if self.chord.process(key, pressed) {
            self.navigator.undo()
        } else {
            false
        }
    }

    /// The selection rectangle due for drawing, if the debounce interval
    /// has passed; in screen coordinates.
    pub fn selection_rect(&mut self) -> Option<SelectionRect> {
        self.navigator.selection_rect(Instant::now())
    }

    /// Render a full frame of the current view.
    pub fn render_frame(&self) -> PixelBuffer {
        self.renderer
            .render_frame(&self.navigator.view(), &self.scheme, self.threshold)
    }

    /// Current view and undo history, one line each, for host-side logging.
    /// Free-form diagnostic output, not a compatibility surface.
    pub fn debug_dump(&self) -> String {
        let view = self.navigator.view();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "screen {}x{}, {} workers",
            self.renderer.width(),
            self.renderer.height(),
            self.renderer.worker_count()
        );
        let _ = writeln!(
            out,
            "view top_left=({}, {}) x_scale={} y_scale={}",
            view.top_left.re, view.top_left.im, view.x_scale, view.y_scale
        );
        for (i, past) in self.navigator.undo_stack().iter().enumerate() {
            let _ = writeln!(
                out,
                "zoom idx={i} top_left=({}, {}) x_scale={} y_scale={}",
                past.top_left.re, past.top_left.im, past.x_scale, past.y_scale
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelzoom_render::ColorScheme;

    fn small_engine() -> Engine {
        let config = EngineConfig {
            threshold: 200,
            scheme: ColorScheme::Monochrome,
            worker_count: Some(2),
            ..EngineConfig::default()
        };
        Engine::new(config, 200, 140, 200, 140).unwrap()
    }

    #[test]
    fn pointer_down_and_move_do_not_request_render() {
        let mut engine = small_engine();
        assert!(!engine.handle_pointer_event(PointerEvent::Down { x: 10.0, y: 10.0 }));
        assert!(!engine.handle_pointer_event(PointerEvent::Moved { x: 80.0, y: 40.0 }));
    }

    #[test]
    fn pointer_up_commits_and_requests_render() {
        let mut engine = small_engine();
        let before = engine.view();
        engine.handle_pointer_event(PointerEvent::Down { x: 10.0, y: 10.0 });
        engine.handle_pointer_event(PointerEvent::Moved { x: 110.0, y: 40.0 });
        assert!(engine.handle_pointer_event(PointerEvent::Up { x: 110.0, y: 40.0 }));
        assert!(engine.view().x_scale < before.x_scale);
    }

    #[test]
    fn undo_chord_round_trip() {
        let mut engine = small_engine();
        let startup = engine.view();
        engine.handle_pointer_event(PointerEvent::Down { x: 10.0, y: 10.0 });
        engine.handle_pointer_event(PointerEvent::Moved { x: 110.0, y: 40.0 });
        engine.handle_pointer_event(PointerEvent::Up { x: 110.0, y: 40.0 });

        assert!(!engine.handle_key_event(Key::Undo, true), "no modifier yet");
        assert!(!engine.handle_key_event(Key::Modifier, true));
        assert!(engine.handle_key_event(Key::Undo, true));
        assert_eq!(engine.view(), startup);

        // Stack is empty now: the chord fires but nothing changes.
        assert!(!engine.handle_key_event(Key::Undo, true));
    }

    #[test]
    fn window_coordinates_are_scaled() {
        // 2× density: window 100×70 backs a 200×140 screen.
        let config = EngineConfig {
            threshold: 100,
            scheme: ColorScheme::Monochrome,
            worker_count: Some(1),
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config, 200, 140, 100, 70).unwrap();
        let before = engine.view();

        engine.handle_pointer_event(PointerEvent::Down { x: 10.0, y: 10.0 });
        engine.handle_pointer_event(PointerEvent::Moved { x: 60.0, y: 30.0 });
        engine.handle_pointer_event(PointerEvent::Up { x: 60.0, y: 30.0 });

        // Window (10,10) is screen (20,20).
        let anchor = mandelzoom_core::ScreenPoint::new(20.0, 20.0);
        assert_eq!(engine.view().top_left, before.to_complex(anchor));
    }

    #[test]
    fn render_frame_matches_screen_size() {
        let engine = small_engine();
        let frame = engine.render_frame();
        assert_eq!((frame.width, frame.height), (200, 140));
    }

    #[test]
    fn dump_lists_history() {
        let mut engine = small_engine();
        engine.handle_pointer_event(PointerEvent::Down { x: 10.0, y: 10.0 });
        engine.handle_pointer_event(PointerEvent::Moved { x: 110.0, y: 40.0 });
        engine.handle_pointer_event(PointerEvent::Up { x: 110.0, y: 40.0 });

        let dump = engine.debug_dump();
        assert!(dump.contains("view top_left="));
        assert!(dump.contains("zoom idx=0"));
    }

    #[test]
    fn invalid_geometry_fails_fast() {
        let config = EngineConfig::default();
        assert!(Engine::new(config.clone(), 0, 140, 200, 140).is_err());
        assert!(Engine::new(config, 200, 140, 0, 140).is_err());
    }
}
