/// Half-width of the median window.
const RADIUS: usize = 2;
/// Samples at each end that pass through unchanged.
const EDGE: usize = 3;

/// 5-wide median over the whole sequence.
///
/// The first and last three samples are copied as-is; every other sample is
/// replaced by the median of itself and its two neighbours on either side.
pub fn median_smooth(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut window = [0.0f64; 2 * RADIUS + 1];

    (0..n)
        .map(|i| {
            if i < EDGE || i + EDGE >= n {
                return values[i];
            }
            window.copy_from_slice(&values[i - RADIUS..=i + RADIUS]);
            window.sort_by(f64::total_cmp);
            window[RADIUS]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sequences_pass_through() {
        let five = [1.0, 2.0, 100.0, 4.0, 5.0];
        assert_eq!(median_smooth(&five), five.to_vec());
        let six = [7.0, -1.0, 3.0, 9.0, 2.0, 8.0];
        assert_eq!(median_smooth(&six), six.to_vec());
        assert!(median_smooth(&[]).is_empty());
    }

    #[test]
    fn replaces_interior_with_window_median() {
        let input = [1.0, 2.0, 3.0, 100.0, 5.0, 6.0, 7.0];
        let out = median_smooth(&input);
        // Only index 3 is interior for length 7; window is [2, 3, 100, 5, 6].
        assert_eq!(out, vec![1.0, 2.0, 3.0, 5.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn uses_unsmoothed_neighbours() {
        let input = [0.0, 0.0, 0.0, 9.0, 9.0, 0.0, 0.0, 0.0];
        let out = median_smooth(&input);
        // Index 3: [0, 0, 9, 9, 0] -> 0; index 4: [0, 9, 9, 0, 0] -> 0.
        assert_eq!(out, vec![0.0; 8]);
    }

    #[test]
    fn preserves_length() {
        let input: Vec<f64> = (0..40).map(|i| (i as f64).sin()).collect();
        assert_eq!(median_smooth(&input).len(), input.len());
    }
}
