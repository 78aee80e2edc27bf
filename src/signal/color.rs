use crate::error::{PulseError, Result};

/// Minimum red mean for a lit, covered lens.
const MIN_RED: f64 = 170.0;
/// Maximum green mean for a lit, covered lens.
const MAX_GREEN: f64 = 10.0;
/// Maximum blue mean for a lit, covered lens.
const MAX_BLUE: f64 = 50.0;

/// Column step of the capture layer's subsampling, in bytes.
const COLUMN_STRIDE: usize = 4;

/// Mean channel values of one frame (0.0-255.0)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorSample {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorSample {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// A finger is covering both the lens and the flash.
    pub fn is_valid(&self) -> bool {
        self.r >= MIN_RED && self.g <= MAX_GREEN && self.b <= MAX_BLUE
    }

    /// HSB hue in [0, 1). Red is 0, green 1/3, blue 2/3; greys map to 0.
    pub fn hue(&self) -> f64 {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta <= 0.0 {
            return 0.0;
        }

        let sector = if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };

        let hue = sector / 6.0;
        if hue < 0.0 {
            // A tiny negative sector rounds up to exactly 1.0.
            let wrapped = hue + 1.0;
            if wrapped >= 1.0 {
                0.0
            } else {
                wrapped
            }
        } else {
            hue
        }
    }
}

/// Average a BGRA frame into a `ColorSample`.
///
/// Sampling follows the capture layer's stride: for every row `y` and every
/// column step `x` in `0..width/4`, the pixel bytes start at
/// `y * (width / 4) + x * 4` (blue, green, red). The buffer must hold at
/// least `width * height` bytes.
pub fn extract_color(pixels: &[u8], width: usize, height: usize) -> Result<ColorSample> {
    let malformed = |reason: &str| PulseError::MalformedFrame {
        width,
        height,
        len: pixels.len(),
        reason: reason.to_string(),
    };

    let required = width
        .checked_mul(height)
        .ok_or_else(|| malformed("frame dimensions overflow"))?;
    if pixels.len() < required {
        return Err(malformed("buffer smaller than width * height"));
    }

    let steps = width / COLUMN_STRIDE;
    let positions = steps * height;
    if positions == 0 {
        return Err(malformed("frame too small to sample"));
    }

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for y in 0..height {
        let row = y * steps;
        for x in 0..steps {
            let offset = row + x * COLUMN_STRIDE;
            let px = pixels
                .get(offset..offset + 3)
                .ok_or_else(|| malformed("sample offset out of range"))?;
            b += px[0] as u64;
            g += px[1] as u64;
            r += px[2] as u64;
        }
    }

    let n = positions as f64;
    Ok(ColorSample {
        r: r as f64 / n,
        g: g as f64 / n,
        b: b as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uniform BGRA frame. Widths that are multiples of 16 keep every sampled
    /// offset aligned to a pixel boundary.
    fn uniform_frame(width: usize, height: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
        [b, g, r, 255].repeat(width * height)
    }

    #[test]
    fn averages_uniform_frame() {
        let frame = uniform_frame(64, 48, 200, 5, 30);
        let sample = extract_color(&frame, 64, 48).unwrap();
        assert_eq!(sample, ColorSample::new(200.0, 5.0, 30.0));
        assert!(sample.is_valid());
    }

    #[test]
    fn samples_every_fourth_column_with_row_offset() {
        // 16x2 frame, only 16*2 = 32 bytes are required.
        let mut frame = vec![0u8; 32];
        // Row 0 samples offsets 0, 4, 8, 12; row 1 samples 4, 8, 12, 16.
        for offset in [0usize, 4, 8, 12, 16] {
            frame[offset + 2] = 240;
        }
        frame[16] = 80; // blue of the last row-1 position only
        let sample = extract_color(&frame, 16, 2).unwrap();
        assert_eq!(sample.r, 240.0);
        assert_eq!(sample.b, 10.0);
        assert_eq!(sample.g, 0.0);
    }

    #[test]
    fn rejects_short_buffer() {
        let err = extract_color(&[0u8; 10], 16, 2).unwrap_err();
        assert!(matches!(err, PulseError::MalformedFrame { len: 10, .. }));
    }

    #[test]
    fn rejects_unsampleable_geometry() {
        assert!(extract_color(&[0u8; 64], 3, 8).is_err());
        assert!(extract_color(&[], 16, 0).is_err());
    }

    #[test]
    fn validity_thresholds_are_inclusive() {
        assert!(ColorSample::new(170.0, 10.0, 50.0).is_valid());
        assert!(!ColorSample::new(169.9, 10.0, 50.0).is_valid());
        assert!(!ColorSample::new(200.0, 10.1, 0.0).is_valid());
        assert!(!ColorSample::new(200.0, 0.0, 50.1).is_valid());
    }

    #[test]
    fn hue_of_primaries() {
        assert_eq!(ColorSample::new(255.0, 0.0, 0.0).hue(), 0.0);
        assert!((ColorSample::new(0.0, 255.0, 0.0).hue() - 1.0 / 3.0).abs() < 1e-12);
        assert!((ColorSample::new(0.0, 0.0, 255.0).hue() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(ColorSample::new(90.0, 90.0, 90.0).hue(), 0.0);
    }

    #[test]
    fn hue_of_bluish_red_wraps_below_one() {
        let hue = ColorSample::new(200.0, 5.0, 30.0).hue();
        let expected = 1.0 - 25.0 / (6.0 * 195.0);
        assert!((hue - expected).abs() < 1e-12);
        assert!(hue < 1.0);
    }

    #[test]
    fn hue_stays_below_one_for_vanishing_blue() {
        let hue = ColorSample::new(255.0, 0.0, 1e-14).hue();
        assert!((0.0..1.0).contains(&hue), "hue was {hue}");
    }
}
