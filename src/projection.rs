use crate::error::{Error, Result};

/// Largest canvas side the PNG encoder and our buffer sizes are happy with.
const MAX_SIDE: f64 = 65_535.0;

/// 16384 x 16384; the RGBA pixmap and its RGB copy together stay under 2 GB.
const MAX_PIXELS: f64 = 268_435_456.0;

/// Rectangular map window in projected meters, pixelized at a fixed scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub meters_per_pixel: f64,
}

impl Window {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, meters_per_pixel: f64) -> Result<Self> {
        let window = Window { xmin, xmax, ymin, ymax, meters_per_pixel };
        window.validate()?;
        Ok(window)
    }

    fn validate(&self) -> Result<()> {
        let values = [self.xmin, self.xmax, self.ymin, self.ymax, self.meters_per_pixel];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidWindow("bounds and scale must be finite".into()));
        }
        if self.meters_per_pixel <= 0.0 {
            return Err(Error::InvalidWindow(format!(
                "meters per pixel must be positive, got {}",
                self.meters_per_pixel
            )));
        }
        if self.xmax <= self.xmin || self.ymax <= self.ymin {
            return Err(Error::InvalidWindow(format!(
                "empty window x {}..{}, y {}..{}",
                self.xmin, self.xmax, self.ymin, self.ymax
            )));
        }
        let (w, h) = self.pixel_extent();
        if w < 1.0 || h < 1.0 || w > MAX_SIDE || h > MAX_SIDE {
            return Err(Error::InvalidWindow(format!(
                "canvas would be {:.0}x{:.0} pixels, each side must be within 1..={}",
                w.floor(),
                h.floor(),
                MAX_SIDE
            )));
        }
        let (cw, ch) = (w.floor(), h.floor());
        if cw * ch > MAX_PIXELS {
            return Err(Error::InvalidWindow(format!(
                "canvas would be {:.0}x{:.0} = {:.0} pixels, the limit is {}",
                cw,
                ch,
                cw * ch,
                MAX_PIXELS
            )));
        }
        Ok(())
    }

    /// Exact window size in pixels.
    pub fn pixel_extent(&self) -> (f64, f64) {
        (
            (self.xmax - self.xmin) / self.meters_per_pixel,
            (self.ymax - self.ymin) / self.meters_per_pixel,
        )
    }

    /// Canvas size in whole pixels (truncated).
    pub fn canvas_size(&self) -> (u32, u32) {
        let (w, h) = self.pixel_extent();
        (w as u32, h as u32)
    }

    /// Map projected meters to canvas pixels; north is up.
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.xmin) / self.meters_per_pixel,
            (self.ymax - y) / self.meters_per_pixel,
        )
    }
}
