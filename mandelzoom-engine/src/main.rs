use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mandelzoom_engine::{Engine, EngineConfig, PointerEvent};
use mandelzoom_render::{export_png, ColorScheme, PaletteKind, SnapshotInfo};

/// Render Mandelbrot views to PNG from the command line.
#[derive(Parser, Debug)]
#[command(name = "mandelzoom", version, about)]
struct Cli {
    /// Frame width in pixels.
    #[arg(long, default_value_t = 1000)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 700)]
    height: u32,

    /// Escape-time iteration cap.
    #[arg(long, default_value_t = 1000)]
    threshold: u32,

    /// Worker-pool size; defaults to hardware concurrency.
    #[arg(long)]
    workers: Option<usize>,

    /// Coloring strategy.
    #[arg(long, value_enum, default_value_t = ModeArg::Smooth)]
    mode: ModeArg,

    /// Palette for the smooth and histogram modes.
    #[arg(long, value_enum, default_value_t = PaletteArg::Classic)]
    palette: PaletteArg,

    /// Zoom selection `x0,y0,x1,y1` in pixels of the startup view;
    /// repeat to zoom deeper, each rectangle relative to the view before it.
    #[arg(long = "zoom", value_parser = parse_zoom)]
    zooms: Vec<ZoomRect>,

    /// Output path for the PNG snapshot.
    #[arg(long, short, default_value = "mandelzoom.png")]
    output: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Monochrome,
    Smooth,
    Histogram,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PaletteArg {
    Grayscale,
    Classic,
    HueWheel,
    HueWheelReversed,
}

impl From<PaletteArg> for PaletteKind {
    fn from(arg: PaletteArg) -> Self {
        match arg {
            PaletteArg::Grayscale => PaletteKind::Grayscale,
            PaletteArg::Classic => PaletteKind::Classic,
            PaletteArg::HueWheel => PaletteKind::HueWheel,
            PaletteArg::HueWheelReversed => PaletteKind::HueWheelReversed,
        }
    }
}

impl Cli {
    fn scheme(&self) -> ColorScheme {
        match self.mode {
            ModeArg::Monochrome => ColorScheme::Monochrome,
            ModeArg::Smooth => ColorScheme::Smooth(self.palette.into()),
            ModeArg::Histogram => ColorScheme::Histogram(self.palette.into()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ZoomRect {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

fn parse_zoom(s: &str) -> Result<ZoomRect, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let [x0, y0, x1, y1] = parts.as_slice() else {
        return Err(format!("expected x0,y0,x1,y1, got {s:?}"));
    };
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok(ZoomRect {
        x0: parse(x0)?,
        y0: parse(y0)?,
        x1: parse(x1)?,
        y1: parse(y1)?,
    })
}

fn main() -> mandelzoom_engine::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = EngineConfig {
        threshold: cli.threshold,
        worker_count: cli.workers,
        scheme: cli.scheme(),
        ..EngineConfig::default()
    };

    let mut engine = Engine::new(config, cli.width, cli.height, cli.width, cli.height)?;
    for zoom in &cli.zooms {
        engine.handle_pointer_event(PointerEvent::Down {
            x: zoom.x0,
            y: zoom.y0,
        });
        engine.handle_pointer_event(PointerEvent::Moved {
            x: zoom.x1,
            y: zoom.y1,
        });
        if !engine.handle_pointer_event(PointerEvent::Up {
            x: zoom.x1,
            y: zoom.y1,
        }) {
            info!(?zoom, "selection too small, ignored");
        }
    }

    let frame = engine.render_frame();
    let info = SnapshotInfo {
        view: engine.view(),
        threshold: cli.threshold,
        scheme: cli.scheme().label(),
    };
    export_png(&frame, &cli.output, &info)?;
    info!(path = %cli.output.display(), "snapshot saved");
    Ok(())
}
