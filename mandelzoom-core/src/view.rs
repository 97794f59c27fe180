use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;

/// A position in screen/pixel space.
///
/// Components are `f64` rather than integers because pointer events arrive in
/// window coordinates and the window→screen conversion on high-density
/// displays produces fractional pixels. Rendering still walks integer rows
/// and columns; this type is for pointer and selection math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The visible region of the complex plane.
///
/// `top_left` is the complex number at screen pixel (0, 0); `x_scale` and
/// `y_scale` are complex-plane units per pixel along each axis. Screen y
/// grows downward while the imaginary axis grows upward, so the y mapping
/// carries a sign flip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub top_left: Complex,
    pub x_scale: f64,
    pub y_scale: f64,
}

impl ViewState {
    /// Create a view with explicit parameters, rejecting degenerate scales.
    pub fn new(top_left: Complex, x_scale: f64, y_scale: f64) -> crate::Result<Self> {
        if !top_left.is_finite() {
            return Err(CoreError::InvalidView {
                reason: format!("top_left must be finite, got {top_left}"),
            });
        }
        if x_scale <= 0.0 || !x_scale.is_finite() || y_scale <= 0.0 || !y_scale.is_finite() {
            return Err(CoreError::InvalidView {
                reason: format!("scales must be positive and finite, got {x_scale}×{y_scale}"),
            });
        }
        Ok(Self {
            top_left,
            x_scale,
            y_scale,
        })
    }

    /// The startup view for a screen of the given pixel dimensions.
    ///
    /// The visible real-axis extent is fixed at 6 units centred on 0
    /// (`top_left.re = -3`), and the imaginary extent is derived from the
    /// screen's aspect ratio so pixels stay square on the complex plane.
    pub fn initial(screen_w: u32, screen_h: u32) -> crate::Result<Self> {
        if screen_w == 0 || screen_h == 0 {
            return Err(CoreError::InvalidView {
                reason: format!("screen dimensions must be > 0, got {screen_w}×{screen_h}"),
            });
        }
        let w = screen_w as f64;
        let h = screen_h as f64;
        let re = -3.0_f64;
        let im = re.abs() * h / w;
        let view = Self {
            top_left: Complex::new(re, im),
            x_scale: (re * 2.0).abs() / w,
            y_scale: (im * 2.0).abs() / h,
        };
        debug!(
            top_left = %view.top_left,
            x_scale = view.x_scale,
            y_scale = view.y_scale,
            "initial view"
        );
        Ok(view)
    }

    /// Map a screen position to its complex-plane point.
    ///
    /// Total: positions outside the actual screen bounds map fine, which the
    /// zoom math relies on for selection-rectangle corners.
    #[inline]
    pub fn to_complex(&self, p: ScreenPoint) -> Complex {
        Complex::new(
            self.top_left.re + p.x * self.x_scale,
            self.top_left.im - p.y * self.y_scale,
        )
    }

    /// Inverse of [`to_complex`](Self::to_complex).
    #[inline]
    pub fn to_screen(&self, z: Complex) -> ScreenPoint {
        ScreenPoint::new(
            (z.re - self.top_left.re) / self.x_scale,
            (self.top_left.im - z.im) / self.y_scale,
        )
    }
}

/// Uniform per-axis scaling between window coordinates (what pointer events
/// report) and screen/pixel coordinates (what buffers are indexed by).
///
/// The two spaces differ on high-density displays; every pointer position
/// must go through [`to_screen`](Self::to_screen) before any other use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowScale {
    sx: f64,
    sy: f64,
}

impl WindowScale {
    pub fn new(
        screen_w: u32,
        screen_h: u32,
        window_w: u32,
        window_h: u32,
    ) -> crate::Result<Self> {
        if screen_w == 0 || screen_h == 0 || window_w == 0 || window_h == 0 {
            return Err(CoreError::InvalidSurface {
                reason: format!(
                    "dimensions must be > 0, got screen {screen_w}×{screen_h}, window {window_w}×{window_h}"
                ),
            });
        }
        Ok(Self {
            sx: screen_w as f64 / window_w as f64,
            sy: screen_h as f64 / window_h as f64,
        })
    }

    #[inline]
    pub fn to_screen(&self, window_x: f64, window_y: f64) -> ScreenPoint {
        ScreenPoint::new(window_x * self.sx, window_y * self.sy)
    }

    #[inline]
    pub fn to_window(&self, p: ScreenPoint) -> (f64, f64) {
        (p.x / self.sx, p.y / self.sy)
    }
}
