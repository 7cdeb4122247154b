use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::{debug, info};
use sha2::{Digest, Sha256};
use tiny_skia::{Color, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{Error, Result};

/// Raster that strokes are composited onto, white until drawn on.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::InvalidWindow(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        pixmap.fill(Color::WHITE);
        Ok(Canvas { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let c = self.pixmap.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue()]
    }

    /// Stroke a straight anti-aliased line with round caps in an opaque gray.
    ///
    /// Non-positive widths draw nothing (a zero width would be a hairline to tiny-skia).
    pub fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, gray: u8) {
        if width.is_nan() || width <= 0.0 {
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(from.0 as f32, from.1 as f32);
        pb.line_to(to.0 as f32, to.1 as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(gray, gray, gray, 255);
        paint.anti_alias = true;

        let mut stroke = Stroke::default();
        stroke.width = width as f32;
        stroke.line_cap = LineCap::Round;

        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Drop the (always opaque) alpha channel.
    fn to_rgb(&self) -> Result<RgbImage> {
        let (width, height) = (self.width(), self.height());
        let mut rgb_pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for chunk in self.pixmap.data().chunks_exact(4) {
            rgb_pixels.extend_from_slice(&chunk[..3]);
        }
        RgbImage::from_raw(width, height, rgb_pixels).ok_or_else(|| {
            Error::InvalidWindow(format!("pixel buffer does not match {}x{}", width, height))
        })
    }

    /// Encode as a lossless RGB PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.to_rgb()?.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Write the PNG to `path`, returning the hex SHA-256 of the written bytes.
    pub fn save_png(&self, path: &Path) -> Result<String> {
        info!("Saving to {:?}...", path);
        let png = self.encode_png()?;
        let write_err = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut out = BufWriter::new(File::create(path).map_err(write_err)?);
        out.write_all(&png).map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let digest = format!("{:x}", Sha256::digest(&png));
        debug!("wrote {} bytes", png.len());
        info!("sha256 {}", digest);
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];

    fn is_black(p: [u8; 3]) -> bool {
        p.iter().all(|&c| c <= 8)
    }

    fn dark_pixels(canvas: &Canvas) -> usize {
        let mut n = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) != WHITE {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_starts_white() {
        let canvas = Canvas::new(4, 3).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (4, 3));
        assert_eq!(dark_pixels(&canvas), 0);
    }

    #[test]
    fn test_zero_sized_canvas_is_an_error() {
        assert!(matches!(Canvas::new(0, 10), Err(Error::InvalidWindow(_))));
    }

    #[test]
    fn test_horizontal_stroke() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.stroke_line((2.0, 10.0), (18.0, 10.0), 2.0, 0);
        // Rows 9 and 10 straddle y = 10 and are fully covered.
        assert!(is_black(canvas.pixel(10, 9)));
        assert!(is_black(canvas.pixel(10, 10)));
        assert_eq!(canvas.pixel(10, 7), WHITE);
        assert_eq!(canvas.pixel(10, 12), WHITE);
    }

    #[test]
    fn test_round_caps_extend_past_endpoints() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.stroke_line((5.0, 10.0), (15.0, 10.0), 4.0, 0);
        assert!(is_black(canvas.pixel(4, 10)));
        assert!(is_black(canvas.pixel(15, 10)));
        assert_eq!(canvas.pixel(18, 10), WHITE);
        // Round, not square: the cap corner stays light.
        assert!(canvas.pixel(16, 8)[0] > canvas.pixel(15, 9)[0]);
    }

    #[test]
    fn test_gray_is_neutral() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.stroke_line((0.0, 5.0), (10.0, 5.0), 4.0, 100);
        let [r, g, b] = canvas.pixel(5, 5);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!((r as i32 - 100).abs() <= 2, "got {r}");
    }

    #[test]
    fn test_later_strokes_cover_earlier() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.stroke_line((0.0, 5.0), (10.0, 5.0), 4.0, 200);
        canvas.stroke_line((0.0, 5.0), (10.0, 5.0), 4.0, 30);
        assert!((canvas.pixel(5, 5)[0] as i32 - 30).abs() <= 2);
    }

    #[test]
    fn test_degenerate_strokes_draw_nothing() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.stroke_line((0.0, 5.0), (10.0, 5.0), 0.0, 0);
        canvas.stroke_line((0.0, 5.0), (10.0, 5.0), -1.0, 0);
        canvas.stroke_line((0.0, 5.0), (10.0, 5.0), f64::NAN, 0);
        canvas.stroke_line((f64::NAN, 5.0), (10.0, 5.0), 2.0, 0);
        canvas.stroke_line((-50.0, -50.0), (-40.0, -40.0), 2.0, 0);
        assert_eq!(dark_pixels(&canvas), 0);
    }

    #[test]
    fn test_clipped_to_canvas() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.stroke_line((-100.0, 5.0), (100.0, 5.0), 2.0, 0);
        assert!(is_black(canvas.pixel(0, 5)));
        assert!(is_black(canvas.pixel(9, 4)));
    }

    #[test]
    fn test_save_png_roundtrips_through_decoder() {
        let mut canvas = Canvas::new(8, 6).unwrap();
        canvas.stroke_line((1.0, 3.0), (7.0, 3.0), 2.0, 0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let digest = canvas.save_png(&path).unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, format!("{:x}", Sha256::digest(std::fs::read(&path).unwrap())));

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(4, 2).0, canvas.pixel(4, 2));
        assert_eq!(decoded.get_pixel(4, 0).0, WHITE);
    }

    #[test]
    fn test_save_png_into_missing_dir() {
        let canvas = Canvas::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = canvas.save_png(&dir.path().join("nope").join("out.png")).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
