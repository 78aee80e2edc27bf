/// Length of the input and output history buffers.
pub const HISTORY_LEN: usize = 9;

/// 4th-order IIR band-pass filter in direct form.
///
/// Each call to `process` shifts both histories by one, scales the new input
/// by `GAIN` and evaluates the recurrence. State persists between calls until
/// `reset`.
#[derive(Clone, Debug)]
pub struct BandpassFilter {
    x: [f64; HISTORY_LEN],
    y: [f64; HISTORY_LEN],
}

impl BandpassFilter {
    pub const GAIN: f64 = 1.232232910e+02;

    /// Feedback weights for `y[0]..y[7]`.
    pub const FEEDBACK: [f64; HISTORY_LEN - 1] = [
        -0.1397436053,
        1.2948188815,
        -5.4070037946,
        13.2683981280,
        -20.9442560520,
        21.7932169160,
        -14.5817197500,
        5.7161939252,
    ];

    pub fn new() -> Self {
        Self {
            x: [0.0; HISTORY_LEN],
            y: [0.0; HISTORY_LEN],
        }
    }

    /// Advance the filter by one sample and return the filtered value.
    pub fn process(&mut self, sample: f64) -> f64 {
        self.x.rotate_left(1);
        self.y.rotate_left(1);

        let x = &mut self.x;
        x[HISTORY_LEN - 1] = sample / Self::GAIN;

        let feedforward = (x[0] + x[8]) - 4.0 * (x[2] + x[6]) + 6.0 * x[4];
        // Accumulate left to right so rounding matches the reference recurrence.
        let out = Self::FEEDBACK
            .iter()
            .zip(self.y.iter())
            .fold(feedforward, |acc, (c, y)| acc + c * y);

        self.y[HISTORY_LEN - 1] = out;
        self.y[HISTORY_LEN - 1]
    }

    pub fn reset(&mut self) {
        self.x = [0.0; HISTORY_LEN];
        self.y = [0.0; HISTORY_LEN];
    }

    pub fn is_zeroed(&self) -> bool {
        self.x.iter().chain(self.y.iter()).all(|&v| v == 0.0)
    }

    pub fn input_history(&self) -> &[f64; HISTORY_LEN] {
        &self.x
    }

    pub fn output_history(&self) -> &[f64; HISTORY_LEN] {
        &self.y
    }
}

impl Default for BandpassFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a fresh filter over a whole sequence.
pub fn filter_all(samples: &[f64]) -> Vec<f64> {
    let mut filter = BandpassFilter::new();
    samples.iter().map(|&s| filter.process(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_output_is_scaled_input() {
        let mut filter = BandpassFilter::new();
        let out = filter.process(BandpassFilter::GAIN);
        // Only x[8] is non-zero on the first step.
        assert!((out - 1.0).abs() < 1e-12);
    }

    #[test]
    fn impulse_response_follows_recurrence() {
        let out = filter_all(&[BandpassFilter::GAIN, 0.0, 0.0]);
        // Step 2: x[7] = 1, feedforward 0, feedback 5.7161939252 * y[7] where y[7] = 1.
        assert!((out[1] - 5.7161939252).abs() < 1e-9);
        // Step 3: x[6] = 1 contributes -4; feedback uses y[6] = 1, y[7] = out[1].
        let expected = -4.0 - 14.5817197500 + 5.7161939252 * out[1];
        assert!((out[2] - expected).abs() < 1e-9);
    }

    #[test]
    fn rejects_constant_offset() {
        // A band-pass filter has no DC gain; a constant hue decays towards zero.
        let out = filter_all(&vec![0.95; 900]);
        let tail_peak = out[800..].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(tail_peak < 1e-3, "tail peak was {tail_peak}");
    }

    #[test]
    fn reset_zeroes_history() {
        let mut filter = BandpassFilter::new();
        for i in 0..20 {
            filter.process(i as f64);
        }
        assert!(!filter.is_zeroed());
        filter.reset();
        assert!(filter.is_zeroed());
        assert_eq!(filter.input_history().len(), HISTORY_LEN);
        assert_eq!(filter.output_history().len(), HISTORY_LEN);
    }

    #[test]
    fn incremental_matches_batch() {
        let samples: Vec<f64> = (0..50).map(|i| (i as f64 * 0.4).sin()).collect();
        let mut filter = BandpassFilter::new();
        let incremental: Vec<f64> = samples.iter().map(|&s| filter.process(s)).collect();
        assert_eq!(incremental, filter_all(&samples));
    }
}
