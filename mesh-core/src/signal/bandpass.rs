//! Bandpass FIR filter: Hamming-windowed sinc, 65 taps (spec §4.2).

use crate::config::{BandConfig, TimingConfig};

const NUM_TAPS: usize = 65;
const CENTER: isize = 32;

/// Designs the 65-tap bandpass FIR for `band`'s passband, Nyquist-normalised
/// to `timing.sample_rate`.
pub fn design_bandpass(band: &BandConfig, timing: &TimingConfig) -> Vec<f64> {
    let nyquist = timing.sample_rate as f64 / 2.0;
    let low_norm = band.preamble_low_freq() / nyquist;
    let high_norm = band.preamble_high_freq() / nyquist;

    (0..NUM_TAPS)
        .map(|j| {
            let n = j as isize - CENTER;
            let sinc = if n == 0 {
                2.0 * (high_norm - low_norm)
            } else {
                let n = n as f64;
                ((2.0 * std::f64::consts::PI * high_norm * n).sin() - (2.0 * std::f64::consts::PI * low_norm * n).sin())
                    / (std::f64::consts::PI * n)
            };
            let hamming = 0.54 - 0.46 * (2.0 * std::f64::consts::PI * j as f64 / (NUM_TAPS as f64 - 1.0)).cos();
            sinc * hamming
        })
        .collect()
}

/// Causal FIR convolution, zero-padding samples before the start of the block.
pub fn convolve(input: &[f32], taps: &[f64]) -> Vec<f32> {
    let mut out = Vec::with_capacity(input.len());
    for n in 0..input.len() {
        let mut acc = 0.0f64;
        for (j, &h) in taps.iter().enumerate() {
            if n >= j {
                acc += h * input[n - j] as f64;
            }
        }
        out.push(acc as f32);
    }
    out
}

/// Stateless bandpass stage: precomputed coefficients applied by convolution.
pub struct Bandpass {
    taps: Vec<f64>,
}

impl Bandpass {
    pub fn new(band: &BandConfig, timing: &TimingConfig) -> Self {
        Self {
            taps: design_bandpass(band, timing),
        }
    }

    pub fn process(&self, block: &[f32]) -> Vec<f32> {
        convolve(block, &self.taps)
    }
}
