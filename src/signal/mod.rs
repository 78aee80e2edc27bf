pub mod bandpass;
pub mod bpm;
pub mod color;
pub mod peaks;
pub mod smoothing;

pub use bandpass::BandpassFilter;
pub use bpm::estimate_bpm;
pub use color::{extract_color, ColorSample};
pub use peaks::count_peaks;
pub use smoothing::median_smooth;

/// Smooth the filtered history, count its beats and derive a rate.
pub fn analyze_filtered(filtered: &[f64], fps: u32) -> Option<u32> {
    let smoothed = median_smooth(filtered);
    let peaks = count_peaks(&smoothed);
    estimate_bpm(peaks, smoothed.len(), fps)
}
