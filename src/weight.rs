//! Count → stroke width → gray level.

/// Stroke width for a traversal count: `2·log10(count) − 1`.
///
/// Counts below 1 (including zero, negatives and NaN) are floored to 1, so the
/// result is always finite and at least −1.
pub fn width(count: f64) -> f64 {
    let count = if count >= 1.0 { count } else { 1.0 };
    2.0 * count.log10() - 1.0
}

/// Gray level in `[0, 1]` for a stroke of width `w`; 0 is black.
///
/// The widest stroke (`w == max_width`) is black and a zero-width stroke sits at 2/3.
pub fn darkness(w: f64, max_width: f64) -> f64 {
    if max_width <= 0.0 {
        return 0.0;
    }
    (max_width - w) / (1.5 * max_width)
}

/// 8-bit gray channel for a darkness value, clamped to the valid range.
pub fn gray_level(d: f64) -> u8 {
    (d.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// What the darkest stroke is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxWidthBasis {
    /// Width of the largest count that survives the cutoff.
    #[default]
    MaxCount,
    /// Width computed from the number of segments in the dump, as older maps did.
    SegmentCount,
}
