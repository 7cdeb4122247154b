//! Density rendering: cutoff, draw order, weights and strokes.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::canvas::Canvas;
use crate::config::RenderConfig;
use crate::dump::{load_dump, Dump, Segment};
use crate::error::Result;
use crate::projection::Window;
use crate::weight::{darkness, gray_level, width, MaxWidthBasis};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub drawn: usize,
    pub below_cutoff: usize,
    pub max_width: f64,
}

/// Wall-clock time spent in each stage of [`run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTimings {
    pub load: Duration,
    pub render: Duration,
    pub save: Duration,
    pub total: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub stats: RenderStats,
    pub timings: StageTimings,
}

pub struct Rendering {
    pub canvas: Canvas,
    pub stats: RenderStats,
}

/// Draws one dump onto a fresh canvas. Consumed by [`Renderer::render`].
pub struct Renderer {
    window: Window,
    cutoff: f64,
    basis: MaxWidthBasis,
}

/// Segments above `cutoff`, least-trafficked first.
///
/// Returns a new view; the loaded order is left alone.
pub fn draw_order(segments: &[Segment], cutoff: f64) -> Vec<&Segment> {
    let mut order: Vec<&Segment> = segments
        .iter()
        .filter(|s| s.count as f64 > cutoff)
        .collect();
    order.sort_unstable_by(|a, b| a.count.total_cmp(&b.count));
    order
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        Ok(Renderer {
            window: config.window()?,
            cutoff: config.cutoff,
            basis: config.max_width_basis,
        })
    }

    pub fn render(self, dump: &Dump) -> Result<Rendering> {
        let (canvas_w, canvas_h) = self.window.canvas_size();
        info!("Rendering {}x{} image...", canvas_w, canvas_h);
        let mut canvas = Canvas::new(canvas_w, canvas_h)?;

        let order = draw_order(&dump.segments, self.cutoff);
        let below_cutoff = dump.segments.len() - order.len();
        debug!(
            "{} segments above cutoff {}, {} skipped",
            order.len(),
            self.cutoff,
            below_cutoff
        );

        let max_width = match self.basis {
            MaxWidthBasis::MaxCount => order.last().map_or(0.0, |s| width(s.count as f64)),
            MaxWidthBasis::SegmentCount => width(dump.declared as f64),
        };
        debug!("max width: {:.3} ({:?})", max_width, self.basis);

        for segment in &order {
            let w = width(segment.count as f64);
            let gray = gray_level(darkness(w, max_width));
            let from = self.window.project(segment.x1 as f64, segment.y1 as f64);
            let to = self.window.project(segment.x2 as f64, segment.y2 as f64);
            canvas.stroke_line(from, to, w, gray);
        }

        Ok(Rendering {
            canvas,
            stats: RenderStats {
                drawn: order.len(),
                below_cutoff,
                max_width,
            },
        })
    }
}

/// Load the configured dump, render it and write the PNG, timing each stage.
pub fn run(config: &RenderConfig) -> Result<RunSummary> {
    let start = Instant::now();
    let renderer = Renderer::new(config)?;

    let dump = load_dump(&config.input)?;
    let load = start.elapsed();
    info!("   duration: {:.2}s", load.as_secs_f64());

    let render_start = Instant::now();
    let Rendering { canvas, stats } = renderer.render(&dump)?;
    let render = render_start.elapsed();
    info!(
        "Drew {} segments ({} below cutoff, max width {:.2})",
        stats.drawn, stats.below_cutoff, stats.max_width
    );
    info!("   duration: {:.2}s", render.as_secs_f64());

    let save_start = Instant::now();
    canvas.save_png(&config.output)?;
    let save = save_start.elapsed();
    info!("   duration: {:.2}s", save.as_secs_f64());

    let total = start.elapsed();
    info!("Total duration: {:.2}s", total.as_secs_f64());
    Ok(RunSummary {
        stats,
        timings: StageTimings {
            load,
            render,
            save,
            total,
        },
    })
}
