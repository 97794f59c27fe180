use serde::{Deserialize, Serialize};

use mandelzoom_core::Escape;

use crate::grid::EscapeGrid;

/// One color, 8 bits per channel.
pub type Rgb = [u8; 3];

const BLACK: Rgb = [0, 0, 0];
const WHITE: Rgb = [255, 255, 255];

/// Entries per interpolated segment of the hue wheel.
const WHEEL_SEGMENT: usize = 256;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// An ordered, non-empty color table, size fixed at construction.
///
/// Lookup is a plain floor index — `table[⌊v·len⌋]` clamped to the last
/// entry — matching the banded look of a fixed table rather than
/// interpolating between entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: &'static str,
    table: Vec<Rgb>,
}

impl Palette {
    pub fn new(name: &'static str, table: Vec<Rgb>) -> Self {
        assert!(!table.is_empty(), "palette must be non-empty");
        Self { name, table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Color for a normalized value; `v` is clamped into `[0, 1]`.
    #[inline]
    pub fn sample(&self, v: f64) -> Rgb {
        let idx = (v.clamp(0.0, 1.0) * self.table.len() as f64) as usize;
        self.table[idx.min(self.table.len() - 1)]
    }

    /// 256 shades with r = g = b.
    pub fn grayscale() -> Self {
        let table = (0..=255u8).map(|i| [i, i, i]).collect();
        Self::new("grayscale", table)
    }

    /// The 17 hand-tuned stops of the classic Ultra Fractal coloring.
    pub fn classic_stops() -> Self {
        Self::new(
            "classic",
            vec![
                [0, 0, 0],
                [66, 30, 15],
                [25, 7, 26],
                [9, 1, 47],
                [4, 4, 73],
                [0, 7, 100],
                [12, 44, 138],
                [24, 82, 177],
                [57, 125, 209],
                [134, 181, 229],
                [211, 236, 248],
                [241, 233, 191],
                [248, 201, 95],
                [255, 170, 0],
                [204, 128, 0],
                [153, 87, 0],
                [106, 52, 3],
            ],
        )
    }

    /// Hue wheel: red → yellow → green → cyan → blue → magenta → red,
    /// 256 linear steps per segment (1536 entries), built once.
    pub fn hue_wheel() -> Self {
        Self::new("hue-wheel", build_wheel(0))
    }

    /// The hue wheel starting from blue instead of red.
    pub fn hue_wheel_reversed() -> Self {
        Self::new("hue-wheel-reversed", build_wheel(4))
    }
}

/// Build the six-segment wheel, starting at segment `first` (red→yellow is
/// segment 0, blue→magenta is segment 4).
fn build_wheel(first: usize) -> Vec<Rgb> {
    // Per-segment channel ramps; `t` runs 0..256.
    let segments: [fn(u8) -> Rgb; 6] = [
        |t| [255, t, 0],       // red → yellow
        |t| [255 - t, 255, 0], // yellow → green
        |t| [0, 255, t],       // green → cyan
        |t| [0, 255 - t, 255], // cyan → blue
        |t| [t, 0, 255],       // blue → magenta
        |t| [255, 0, 255 - t], // magenta → red
    ];

    let mut table = Vec::with_capacity(6 * WHEEL_SEGMENT);
    for seg in 0..6 {
        let ramp = segments[(first + seg) % 6];
        for t in 0..WHEEL_SEGMENT {
            table.push(ramp(t as u8));
        }
    }
    table
}

// ---------------------------------------------------------------------------
// Color mappers
// ---------------------------------------------------------------------------

/// Maps one escape result to a color.
///
/// Implementations are plain structs picked by the caller; the colorize
/// pass is generic over the mapper so the per-pixel call is statically
/// dispatched.
pub trait ColorMapper {
    fn shade(&self, e: Escape, threshold: u32) -> Rgb;
}

/// Binary membership: set members black, escaped points white.
#[derive(Debug, Clone, Copy, Default)]
pub struct Monochrome;

impl ColorMapper for Monochrome {
    fn shade(&self, e: Escape, _threshold: u32) -> Rgb {
        match e {
            Escape::Bounded => BLACK,
            Escape::Escaped { .. } => WHITE,
        }
    }
}

/// Palette indexed by the smooth normalized escape value.
///
/// Set members are solid black regardless of palette, keeping the interior
/// dark under every table.
#[derive(Debug, Clone, Copy)]
pub struct Smooth<'a> {
    pub palette: &'a Palette,
}

impl ColorMapper for Smooth<'_> {
    fn shade(&self, e: Escape, threshold: u32) -> Rgb {
        match e {
            Escape::Bounded => BLACK,
            escaped => self.palette.sample(escaped.normalized(threshold)),
        }
    }
}

/// Palette indexed by the cumulative fraction of pixels whose iteration
/// count is ≤ this pixel's, built from a whole-frame grid.
///
/// Redistributes the palette so that visually common iteration counts get
/// proportionally more distinct colors than the raw normalized value would
/// give them.
#[derive(Debug, Clone)]
pub struct HistogramEqualized<'a> {
    palette: &'a Palette,
    /// `rank[n]` = fraction of pixels with iteration count ≤ n; bounded
    /// pixels occupy the `threshold` bucket.
    rank: Vec<f64>,
}

impl<'a> HistogramEqualized<'a> {
    pub fn build(grid: &EscapeGrid, palette: &'a Palette) -> Self {
        let buckets = grid.threshold as usize + 1;
        let mut counts = vec![0u64; buckets];
        for &e in &grid.data {
            let n = match e {
                Escape::Escaped { iterations, .. } => (iterations as usize).min(buckets - 1),
                Escape::Bounded => buckets - 1,
            };
            counts[n] += 1;
        }

        let total = grid.data.len().max(1) as f64;
        let mut rank = vec![0.0_f64; buckets];
        let mut cumulative = 0u64;
        for (n, &c) in counts.iter().enumerate() {
            cumulative += c;
            rank[n] = cumulative as f64 / total;
        }

        Self { palette, rank }
    }
}

impl ColorMapper for HistogramEqualized<'_> {
    fn shade(&self, e: Escape, threshold: u32) -> Rgb {
        let n = match e {
            Escape::Escaped { iterations, .. } => iterations.min(threshold) as usize,
            Escape::Bounded => threshold as usize,
        };
        self.palette.sample(self.rank[n])
    }
}

// ---------------------------------------------------------------------------
// Caller-facing scheme selection
// ---------------------------------------------------------------------------

/// Which built-in palette table to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteKind {
    Grayscale,
    Classic,
    HueWheel,
    HueWheelReversed,
}

impl PaletteKind {
    pub fn build(self) -> Palette {
        match self {
            Self::Grayscale => Palette::grayscale(),
            Self::Classic => Palette::classic_stops(),
            Self::HueWheel => Palette::hue_wheel(),
            Self::HueWheelReversed => Palette::hue_wheel_reversed(),
        }
    }
}

/// Coloring strategy for a frame. A configuration choice made by the
/// caller; variants have no structural dependency on each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "palette", rename_all = "kebab-case")]
pub enum ColorScheme {
    Monochrome,
    Smooth(PaletteKind),
    Histogram(PaletteKind),
}

impl ColorScheme {
    /// Short diagnostic label, e.g. for export metadata and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Monochrome => "monochrome".into(),
            Self::Smooth(kind) => format!("smooth/{}", kind.build().name),
            Self::Histogram(kind) => format!("histogram/{}", kind.build().name),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::Smooth(PaletteKind::Classic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelzoom_core::Complex;

    fn escaped(iterations: u32, norm_sq: f64) -> Escape {
        Escape::Escaped {
            iterations,
            norm_sq,
        }
    }

    #[test]
    fn palette_sizes() {
        assert_eq!(Palette::grayscale().len(), 256);
        assert_eq!(Palette::classic_stops().len(), 17);
        assert_eq!(Palette::hue_wheel().len(), 1536);
        assert_eq!(Palette::hue_wheel_reversed().len(), 1536);
    }

    #[test]
    fn sample_clamps_both_ends() {
        let p = Palette::grayscale();
        assert_eq!(p.sample(-0.5), [0, 0, 0]);
        assert_eq!(p.sample(0.0), [0, 0, 0]);
        assert_eq!(p.sample(1.0), [255, 255, 255]);
        assert_eq!(p.sample(2.0), [255, 255, 255]);
    }

    #[test]
    fn sample_uses_floor_indexing() {
        let p = Palette::classic_stops();
        // v in [0, 1/17) must land on the first stop.
        assert_eq!(p.sample(0.05), [0, 0, 0]);
        // 2/17 ≈ 0.1176 crosses into the third stop.
        assert_eq!(p.sample(0.12), [25, 7, 26]);
    }

    #[test]
    fn hue_wheel_hits_the_six_corners() {
        let p = Palette::hue_wheel();
        assert_eq!(p.sample(0.0), [255, 0, 0]); // red
        let sixth = 1.0 / 6.0;
        assert_eq!(p.sample(sixth), [255, 255, 0]); // yellow
        assert_eq!(p.sample(2.0 * sixth), [0, 255, 0]); // green
        assert_eq!(p.sample(3.0 * sixth), [0, 255, 255]); // cyan
        assert_eq!(p.sample(4.0 * sixth), [0, 0, 255]); // blue
        assert_eq!(p.sample(5.0 * sixth), [255, 0, 255]); // magenta
    }

    #[test]
    fn reversed_wheel_starts_at_blue() {
        let p = Palette::hue_wheel_reversed();
        assert_eq!(p.sample(0.0), [0, 0, 255]);
    }

    #[test]
    fn monochrome_membership() {
        let m = Monochrome;
        assert_eq!(m.shade(Escape::Bounded, 800), BLACK);
        assert_eq!(m.shade(escaped(3, 9.0), 800), WHITE);
    }

    #[test]
    fn smooth_interior_is_black() {
        let palette = Palette::hue_wheel();
        let m = Smooth { palette: &palette };
        assert_eq!(m.shade(Escape::Bounded, 800), BLACK);
    }

    #[test]
    fn smooth_exterior_follows_palette() {
        let palette = Palette::grayscale();
        let m = Smooth { palette: &palette };
        let e = mandelzoom_core::evaluate(Complex::new(1.0, 0.0), 100);
        let c = m.shade(e, 100);
        assert_eq!(c, palette.sample(e.normalized(100)));
    }

    #[test]
    fn histogram_degenerate_frame_is_uniform() {
        // Every pixel escapes at iteration 0: one bucket, one color.
        let mut grid = EscapeGrid::new(8, 8, 100);
        for e in grid.data.iter_mut() {
            *e = escaped(0, 25.0);
        }
        let palette = Palette::hue_wheel();
        let m = HistogramEqualized::build(&grid, &palette);
        let first = m.shade(grid.data[0], 100);
        assert!(grid.data.iter().all(|&e| m.shade(e, 100) == first));
    }

    #[test]
    fn histogram_ranks_are_monotone() {
        let mut grid = EscapeGrid::new(4, 4, 50);
        for (i, e) in grid.data.iter_mut().enumerate() {
            *e = escaped((i % 5) as u32 * 10, 5.0);
        }
        let palette = Palette::grayscale();
        let m = HistogramEqualized::build(&grid, &palette);
        for pair in m.rank.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!((m.rank[50] - 1.0).abs() < 1e-12, "cdf must end at 1");
    }

    #[test]
    fn histogram_spreads_common_counts() {
        // 15 pixels at n=1, one at n=40: the n=1 band already covers ~94%
        // of the palette range.
        let mut grid = EscapeGrid::new(4, 4, 50);
        for e in grid.data.iter_mut() {
            *e = escaped(1, 5.0);
        }
        grid.data[0] = escaped(40, 5.0);
        let palette = Palette::grayscale();
        let m = HistogramEqualized::build(&grid, &palette);
        assert!(m.rank[1] > 0.9);
    }

    #[test]
    fn scheme_serde_round_trip() {
        for scheme in [
            ColorScheme::Monochrome,
            ColorScheme::Smooth(PaletteKind::HueWheel),
            ColorScheme::Histogram(PaletteKind::Grayscale),
        ] {
            let json = serde_json::to_string(&scheme).unwrap();
            let back: ColorScheme = serde_json::from_str(&json).unwrap();
            assert_eq!(scheme, back);
        }
    }
}
