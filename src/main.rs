use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

mod canvas;
mod config;
mod dump;
mod error;
mod projection;
mod render;
mod weight;

use config::RenderConfig;
use weight::MaxWidthBasis;

#[derive(Parser)]
#[command(name = "flowmap")]
#[command(about = "Render weighted route segments as a flow density map.", long_about = None)]
struct Args {
    // Input / Output
    /// Load the segment dump from this FILE.
    #[arg(short = 'i', long = "input", value_name = "FILE", default_value = config::INPUT_PATH)]
    input: PathBuf,

    /// Write the PNG map to this FILE.
    #[arg(short = 'o', long = "out", value_name = "FILE", default_value = config::OUTPUT_PATH)]
    out: PathBuf,

    // Map Window Options
    /// Meters covered by one output pixel.
    #[arg(short = 's', long = "meters-per-pixel", value_name = "M", default_value_t = config::METERS_PER_PIXEL)]
    meters_per_pixel: f64,

    /// West edge of the map, in projected meters.
    #[arg(long = "xmin", value_name = "M", default_value_t = config::XMIN, allow_negative_numbers = true)]
    xmin: f64,

    /// East edge of the map, in projected meters.
    #[arg(long = "xmax", value_name = "M", default_value_t = config::XMAX, allow_negative_numbers = true)]
    xmax: f64,

    /// South edge of the map, in projected meters.
    #[arg(long = "ymin", value_name = "M", default_value_t = config::YMIN, allow_negative_numbers = true)]
    ymin: f64,

    /// North edge of the map, in projected meters.
    #[arg(long = "ymax", value_name = "M", default_value_t = config::YMAX, allow_negative_numbers = true)]
    ymax: f64,

    // Rendering Options
    /// Skip segments whose count is not above N.
    #[arg(short = 'c', long = "cutoff", value_name = "N", default_value_t = config::CUTOFF, allow_negative_numbers = true)]
    cutoff: f64,

    /// Scale darkness against the number of segments instead of the largest count.
    #[arg(long = "legacy-max-width")]
    legacy_max_width: bool,

    // Logging
    /// Verbosity level (0 = error, 1 = info, 2 = debug).
    #[arg(short = 'v', long = "verbose", value_name = "N", default_value_t = 1)]
    verbose: u8,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            meters_per_pixel: self.meters_per_pixel,
            xmin: self.xmin,
            xmax: self.xmax,
            ymin: self.ymin,
            ymax: self.ymax,
            cutoff: self.cutoff,
            input: self.input.clone(),
            output: self.out.clone(),
            max_width_basis: if self.legacy_max_width {
                MaxWidthBasis::SegmentCount
            } else {
                MaxWidthBasis::MaxCount
            },
        }
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    info!("Starting flow map...");

    let summary = match render::run(&args.render_config()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let t = summary.timings;
    debug!(
        "load {:.2}s, render {:.2}s, save {:.2}s",
        t.load.as_secs_f64(),
        t.render.as_secs_f64(),
        t.save.as_secs_f64()
    );
    info!(
        "Done: {} segments drawn in {:.2}s.",
        summary.stats.drawn,
        t.total.as_secs_f64()
    );
}
