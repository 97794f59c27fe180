use std::time::{Duration, Instant};

use tracing::debug;

use mandelzoom_core::{ScreenPoint, ViewState};

/// Default debounce for selection-rectangle recomputation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Default capacity increment for the undo stack.
pub const DEFAULT_UNDO_GROWTH: usize = 100;

// ---------------------------------------------------------------------------
// Undo stack
// ---------------------------------------------------------------------------

/// LIFO history of committed views, oldest first.
///
/// Entries are plain values; capacity grows by a fixed increment when full
/// and never shrinks. Exclusively owned by the navigator — the backing
/// storage may move on push, so nothing holds references into it.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: Vec<ViewState>,
    growth: usize,
}

impl UndoStack {
    pub fn new(growth: usize) -> Self {
        let growth = growth.max(1);
        Self {
            entries: Vec::with_capacity(growth),
            growth,
        }
    }

    pub fn push(&mut self, view: ViewState) {
        if self.entries.len() == self.entries.capacity() {
            self.entries.reserve_exact(self.growth);
        }
        self.entries.push(view);
    }

    pub fn pop(&mut self) -> Option<ViewState> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Committed views, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ViewState> {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Live zoom-selection state, alive from pointer-down to commit.
#[derive(Debug, Clone, Copy)]
struct PendingSelection {
    anchor: ScreenPoint,
    cursor: ScreenPoint,
    last_moved: Instant,
}

/// The aspect-corrected selection rectangle, in screen coordinates.
///
/// `width` and `height` are signed: dragging up or left gives negative
/// extents, same as the raw cursor delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// The aspect-corrected corner opposite the anchor — where the host
    /// should place the cursor.
    pub fn corner(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width, self.y + self.height)
    }
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// The view/zoom state machine: `Idle` ⇄ `Selecting`, plus the undo stack.
///
/// All mutation happens on the host's input thread, between frames; a
/// render always observes a stable copy of the view.
#[derive(Debug)]
pub struct ZoomNavigator {
    screen_w: f64,
    screen_h: f64,
    view: ViewState,
    undo: UndoStack,
    selection: Option<PendingSelection>,
    debounce: Duration,
}

impl ZoomNavigator {
    pub fn new(
        view: ViewState,
        screen_w: u32,
        screen_h: u32,
        debounce: Duration,
        undo_growth: usize,
    ) -> Self {
        Self {
            screen_w: screen_w as f64,
            screen_h: screen_h as f64,
            view,
            undo: UndoStack::new(undo_growth),
            selection: None,
            debounce,
        }
    }

    /// Current view; a `Copy` snapshot, stable for a whole frame.
    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_some()
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    fn aspect(&self) -> f64 {
        self.screen_h / self.screen_w
    }

    /// `Idle → Selecting`: the anchor is both origin and initial cursor.
    pub fn begin_selection(&mut self, anchor: ScreenPoint, now: Instant) {
        self.selection = Some(PendingSelection {
            anchor,
            cursor: anchor,
            last_moved: now,
        });
    }

    /// Update the live cursor; ignored when idle.
    pub fn cursor_move(&mut self, p: ScreenPoint, now: Instant) {
        if let Some(sel) = self.selection.as_mut() {
            sel.cursor = p;
            sel.last_moved = now;
        }
    }

    /// The selection rectangle to draw, or `None` while idle or within the
    /// debounce window after the last cursor move.
    ///
    /// The rectangle's height is derived from its width to keep the screen
    /// aspect ratio, and the stored cursor is snapped to the corrected
    /// corner so a commit uses exactly what was drawn.
    pub fn selection_rect(&mut self, now: Instant) -> Option<SelectionRect> {
        let debounce = self.debounce;
        let aspect = self.aspect();
        let sel = self.selection.as_mut()?;
        if now.duration_since(sel.last_moved) < debounce {
            return None;
        }
        let rect = aspect_corrected(sel.anchor, sel.cursor, aspect);
        sel.cursor = rect.corner();
        Some(rect)
    }

    /// `Selecting → Idle`: map the selection into the complex plane, save
    /// the current view for undo, and install the zoomed view.
    ///
    /// Degenerate (zero-area) selections are discarded without committing,
    /// since they would produce a zero scale and divide-by-zero on the next
    /// render. Returns whether the view changed.
    pub fn commit(&mut self) -> bool {
        let Some(sel) = self.selection.take() else {
            return false;
        };

        // Snap once more: the last cursor move may still be inside the
        // debounce window.
        let rect = aspect_corrected(sel.anchor, sel.cursor, self.aspect());
        let corner = rect.corner();

        let a = self.view.to_complex(sel.anchor);
        let b = self.view.to_complex(corner);
        let x_scale = (b.re - a.re).abs() / self.screen_w;
        let y_scale = (b.im - a.im).abs() / self.screen_h;

        // The new origin is the top-left of the rectangle regardless of
        // drag direction.
        let top_left = self.view.to_complex(ScreenPoint::new(
            sel.anchor.x.min(corner.x),
            sel.anchor.y.min(corner.y),
        ));

        match ViewState::new(top_left, x_scale, y_scale) {
            Ok(zoomed) => {
                self.undo.push(self.view);
                self.view = zoomed;
                debug!(
                    top_left = %zoomed.top_left,
                    x_scale = zoomed.x_scale,
                    y_scale = zoomed.y_scale,
                    depth = self.undo.len(),
                    "zoom committed"
                );
                true
            }
            Err(_) => {
                debug!("degenerate selection discarded");
                false
            }
        }
    }

    /// Pop the most recent committed view, if any. Available in any state;
    /// a no-op on an empty stack.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(prior) => {
                self.view = prior;
                debug!(depth = self.undo.len(), "zoom undone");
                true
            }
            None => false,
        }
    }
}

/// Force the screen aspect ratio on a selection: the height is recomputed
/// from the width (`ceil(width · h/w)`, sign preserved).
fn aspect_corrected(anchor: ScreenPoint, cursor: ScreenPoint, aspect: f64) -> SelectionRect {
    let width = cursor.x - anchor.x;
    let height = (width * aspect).ceil();
    SelectionRect {
        x: anchor.x,
        y: anchor.y,
        width,
        height,
    }
}
