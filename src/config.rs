use std::path::PathBuf;

use crate::error::Result;
use crate::projection::Window;
use crate::weight::MaxWidthBasis;

/// Meters per output pixel; 300 gives a 4000 x 4000 map of France.
pub const METERS_PER_PIXEL: f64 = 100.0;

// Bounding box of metropolitan France in Lambert-93.
pub const XMIN: f64 = 100.0 * 1000.0;
pub const XMAX: f64 = 1300.0 * 1000.0;
pub const YMIN: f64 = 6000.0 * 1000.0;
pub const YMAX: f64 = 7200.0 * 1000.0;

/// Segments with a count at or below this are not drawn.
pub const CUTOFF: f64 = 10.0;

pub const INPUT_PATH: &str = "edges_dump";
pub const OUTPUT_PATH: &str = "routes_from_nd.png";

/// Everything one rendering pass needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub meters_per_pixel: f64,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub cutoff: f64,
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_width_basis: MaxWidthBasis,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            meters_per_pixel: METERS_PER_PIXEL,
            xmin: XMIN,
            xmax: XMAX,
            ymin: YMIN,
            ymax: YMAX,
            cutoff: CUTOFF,
            input: PathBuf::from(INPUT_PATH),
            output: PathBuf::from(OUTPUT_PATH),
            max_width_basis: MaxWidthBasis::default(),
        }
    }
}

impl RenderConfig {
    pub fn window(&self) -> Result<Window> {
        Window::new(self.xmin, self.xmax, self.ymin, self.ymax, self.meters_per_pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_france() {
        let config = RenderConfig::default();
        assert_eq!(config.cutoff, 10.0);
        assert_eq!(config.input, PathBuf::from("edges_dump"));
        assert_eq!(config.output, PathBuf::from("routes_from_nd.png"));
        assert_eq!(config.max_width_basis, MaxWidthBasis::MaxCount);
        assert_eq!(config.window().unwrap().canvas_size(), (12_000, 12_000));
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let config = RenderConfig {
            meters_per_pixel: 0.0,
            ..RenderConfig::default()
        };
        assert!(config.window().is_err());
    }
}
