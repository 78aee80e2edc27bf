/// Neighbours compared on each side of a candidate.
const REACH: usize = 3;
/// Forced advance after a counted peak.
pub const REFRACTORY_SKIP: usize = 4;

/// Count positive local maxima.
///
/// A candidate must be strictly above its three left neighbours and at least
/// equal to its three right neighbours; after a hit the scan jumps ahead by
/// `REFRACTORY_SKIP` so a flat-topped beat is only counted once.
pub fn count_peaks(values: &[f64]) -> usize {
    let end = values.len().saturating_sub(REACH);
    let mut count = 0;
    let mut i = REACH;

    while i < end {
        if is_peak(values, i) {
            count += 1;
            i += REFRACTORY_SKIP;
        } else {
            i += 1;
        }
    }

    count
}

fn is_peak(values: &[f64], i: usize) -> bool {
    let v = values[i];
    v > 0.0
        && values[i - REACH..i].iter().all(|&left| v > left)
        && values[i + 1..=i + REACH].iter().all(|&right| v >= right)
}
