/// Beats per minute averaged over the whole analysed window.
///
/// Returns `None` while no time has elapsed (no samples, or fps of zero).
pub fn estimate_bpm(peak_count: usize, sample_count: usize, fps: u32) -> Option<u32> {
    if fps == 0 {
        return None;
    }
    let seconds = sample_count as f64 / fps as f64;
    let minutes = seconds / 60.0;
    if minutes <= 0.0 {
        return None;
    }
    Some((peak_count as f64 / minutes) as u32)
}
