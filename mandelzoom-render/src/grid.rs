use mandelzoom_core::Escape;

/// Per-pixel escape results for a full frame, row-major.
///
/// The raw output of the compute pass, kept separate from colored pixels so
/// a palette change (or the histogram pass, which needs the whole frame's
/// iteration counts first) never re-runs the iteration loop.
#[derive(Clone)]
pub struct EscapeGrid {
    pub width: u32,
    pub height: u32,
    /// Escape-time cap the grid was computed with.
    pub threshold: u32,
    pub data: Vec<Escape>,
}

impl EscapeGrid {
    pub fn new(width: u32, height: u32, threshold: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            threshold,
            data: vec![Escape::Bounded; size],
        }
    }

    #[inline]
    pub fn at(&self, x: u32, y: u32) -> Escape {
        self.data[y as usize * self.width as usize + x as usize]
    }
}
