//! Frame sources for driving a session without a camera.

use std::f64::consts::PI;
use std::io::{ErrorKind, Read};

use crate::error::{PulseError, Result};

/// Bytes per BGRA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Size in bytes of one `width` x `height` BGRA frame.
pub fn frame_bytes(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            PulseError::InvalidConfiguration(format!(
                "frame size {width}x{height} overflows the address space"
            ))
        })
}

/// Reads consecutive BGRA frames from a raw dump.
///
/// A short trailing chunk is yielded as-is so the session can reject it as
/// malformed.
pub struct RawFrameReader<R> {
    reader: R,
    frame_len: usize,
    done: bool,
}

impl<R: Read> RawFrameReader<R> {
    pub fn new(reader: R, width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            reader,
            frame_len: frame_bytes(width, height)?,
            done: false,
        })
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    fn read_frame(&mut self) -> std::io::Result<Vec<u8>> {
        let mut frame = vec![0u8; self.frame_len];
        let mut filled = 0;
        while filled < frame.len() {
            match self.reader.read(&mut frame[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        frame.truncate(filled);
        Ok(frame)
    }
}

impl<R: Read> Iterator for RawFrameReader<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.frame_len == 0 {
            return None;
        }
        match self.read_frame() {
            Ok(frame) if frame.is_empty() => {
                self.done = true;
                None
            }
            Ok(frame) => {
                if frame.len() < self.frame_len {
                    self.done = true;
                }
                Some(Ok(frame))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

/// Synthetic frames of a fingertip over a lit lens.
///
/// The first `lead_in` frames show an uncovered lens; after that the blue
/// channel pulses sinusoidally at `bpm` while red stays high and green low.
pub struct SimulatedFinger {
    pixels: usize,
    fps: u32,
    beat_hz: f64,
    lead_in: usize,
    frame: usize,
    total: usize,
}

impl SimulatedFinger {
    pub fn new(
        width: usize,
        height: usize,
        fps: u32,
        bpm: f64,
        lead_in: usize,
        covered_frames: usize,
    ) -> Result<Self> {
        // Keeps every sampled offset on a pixel boundary.
        if width == 0 || width % 16 != 0 || height == 0 {
            return Err(PulseError::InvalidConfiguration(format!(
                "simulated frames need a non-zero width divisible by 16 \
                 and a non-zero height, got {width}x{height}"
            )));
        }
        frame_bytes(width, height)?;
        if fps == 0 || !(bpm > 0.0) {
            return Err(PulseError::InvalidConfiguration(
                "simulation needs positive fps and bpm".into(),
            ));
        }
        Ok(Self {
            pixels: width * height,
            fps,
            beat_hz: bpm / 60.0,
            lead_in,
            frame: 0,
            total: lead_in.saturating_add(covered_frames),
        })
    }

    fn render(&self, b: u8, g: u8, r: u8) -> Vec<u8> {
        [b, g, r, 255].repeat(self.pixels)
    }
}

impl Iterator for SimulatedFinger {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame >= self.total {
            return None;
        }
        let index = self.frame;
        self.frame += 1;

        if index < self.lead_in {
            return Some(self.render(120, 130, 140));
        }

        let t = (index - self.lead_in) as f64 / self.fps as f64;
        let blue = 30.0 + 15.0 * (2.0 * PI * self.beat_hz * t).sin();
        Some(self.render(blue.round() as u8, 5, 200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::extract_color;
    use std::io::Cursor;

    #[test]
    fn reads_whole_frames_then_partial_tail() {
        let data = vec![7u8; 16 * 2 * 4 * 2 + 10];
        let reader = RawFrameReader::new(Cursor::new(data), 16, 2).unwrap();
        assert_eq!(reader.frame_len(), 128);
        let frames: Vec<_> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].len(), 128);
        assert_eq!(frames[1].len(), 128);
        assert_eq!(frames[2].len(), 10);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let mut reader = RawFrameReader::new(Cursor::new(Vec::new()), 16, 2).unwrap();
        assert!(reader.next().is_none());
    }

    #[test]
    fn huge_dimensions_are_rejected() {
        let reader = RawFrameReader::new(Cursor::new(vec![0u8; 4]), usize::MAX / 2, 3);
        assert!(matches!(reader, Err(PulseError::InvalidConfiguration(_))));
        assert!(frame_bytes(usize::MAX / 4 + 1, 1).is_err());
        assert_eq!(frame_bytes(192, 144).unwrap(), 192 * 144 * 4);

        let sim = SimulatedFinger::new(usize::MAX / 32 * 16, 3, 30, 72.0, 0, 10);
        assert!(matches!(sim, Err(PulseError::InvalidConfiguration(_))));
    }

    #[test]
    fn simulated_frames_are_covered_after_lead_in() {
        let frames: Vec<_> = SimulatedFinger::new(32, 8, 30, 72.0, 2, 30).unwrap().collect();
        assert_eq!(frames.len(), 32);

        let uncovered = extract_color(&frames[0], 32, 8).unwrap();
        assert!(!uncovered.is_valid());

        for frame in &frames[2..] {
            let sample = extract_color(frame, 32, 8).unwrap();
            assert!(sample.is_valid(), "{sample:?}");
        }
    }

    #[test]
    fn simulation_rejects_unaligned_width() {
        assert!(SimulatedFinger::new(20, 8, 30, 72.0, 0, 10).is_err());
        assert!(SimulatedFinger::new(32, 8, 0, 72.0, 0, 10).is_err());
        assert!(SimulatedFinger::new(32, 8, 30, 0.0, 0, 10).is_err());
    }
}
