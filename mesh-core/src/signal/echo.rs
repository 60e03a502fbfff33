//! Adaptive LMS echo cancellation (spec §4.2).
//!
//! Deviation from the naive design: the delay line is fed with the
//! *outgoing transmitted* reference signal rather than the incoming signal
//! being cancelled, since only the transmitted signal is a true echo
//! reference (see SPEC_FULL.md §9 / DESIGN.md). `process` therefore takes
//! the outgoing reference block as an explicit argument.

pub const ECHO_TAPS: usize = 128;
const MU: f64 = 0.01;
const DELAY_LINE_SECONDS: f64 = 1.0;

pub struct EchoCanceller {
    delay_line: Vec<f64>,
    head: usize,
    taps: Vec<f64>,
}

impl EchoCanceller {
    pub fn new(sample_rate: usize) -> Self {
        let delay_len = ((sample_rate as f64) * DELAY_LINE_SECONDS).max(ECHO_TAPS as f64) as usize;
        Self {
            delay_line: vec![0.0; delay_len],
            head: 0,
            taps: vec![0.0; ECHO_TAPS],
        }
    }

    /// Cancels echo from `input` using `reference` (the outgoing transmitted
    /// samples for the same time span) as the adaptive filter's reference
    /// signal. Returns the cleaned block.
    pub fn process(&mut self, input: &[f32], reference: &[f32]) -> Vec<f32> {
        let n = self.delay_line.len();
        let mut out = Vec::with_capacity(input.len());

        for i in 0..input.len() {
            let x = input[i] as f64;
            let r = reference.get(i).copied().unwrap_or(0.0) as f64;

            let mut y_hat = 0.0;
            for (j, &h) in self.taps.iter().enumerate() {
                let idx = (self.head + n - j) % n;
                y_hat += h * self.delay_line[idx];
            }

            let e = x - y_hat;

            for (j, h) in self.taps.iter_mut().enumerate() {
                let idx = (self.head + n - j) % n;
                *h += MU * e * self.delay_line[idx];
            }

            self.head = (self.head + 1) % n;
            self.delay_line[self.head] = r;

            out.push(e as f32);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_reference_leaves_input_unchanged_before_adaptation() {
        let mut canceller = EchoCanceller::new(8_000);
        let input = vec![0.5f32, -0.3, 0.2];
        let reference = vec![0.0f32; 3];
        let out = canceller.process(&input, &reference);
        assert_eq!(out, input);
    }

    #[test]
    fn converges_to_cancel_scaled_echo_of_reference() {
        // Feed a reference tone, then the same tone (scaled) as "input" so
        // the filter learns to predict and subtract it, the way a real echo
        // of the device's own transmission would appear at the microphone.
        let mut canceller = EchoCanceller::new(8_000);
        let n = 400;
        let reference: Vec<f32> = (0..n).map(|i| (i as f32 * 0.2).sin()).collect();
        let echoed: Vec<f32> = reference.iter().map(|&s| s * 0.6).collect();

        let mut last_energy = f64::MAX;
        for _ in 0..20 {
            let out = canceller.process(&echoed, &reference);
            last_energy = out.iter().map(|&s| (s as f64).powi(2)).sum();
        }
        let input_energy: f64 = echoed.iter().map(|&s| (s as f64).powi(2)).sum();
        assert!(last_energy < input_energy);
    }
}
