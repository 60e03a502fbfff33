//! Doppler shift detection and compensation (spec §4.2).

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use std::collections::VecDeque;
use std::sync::Arc;

use super::denoise::FFT_SIZE;

const RING_CAPACITY: usize = 10;
const COMPENSATION_THRESHOLD_HZ: f64 = 5.0;

/// Tracks recent (detected - expected) peak-frequency errors and compensates
/// blocks whose estimated Doppler shift exceeds the threshold.
pub struct DopplerTracker {
    fft: Arc<dyn rustfft::Fft<f64>>,
    errors: VecDeque<f64>,
    sample_rate: f64,
}

impl DopplerTracker {
    pub fn new(sample_rate: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(FFT_SIZE),
            errors: VecDeque::with_capacity(RING_CAPACITY),
            sample_rate: sample_rate as f64,
        }
    }

    /// FFT-magnitude argmax with quadratic interpolation of the three
    /// surrounding bins.
    fn detect_peak_freq(&self, block: &[f32]) -> f64 {
        let mut buffer: Vec<Complex64> = (0..FFT_SIZE)
            .map(|i| Complex64::new(block.get(i).copied().unwrap_or(0.0) as f64, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let half = FFT_SIZE / 2;
        let magnitudes: Vec<f64> = buffer[..half].iter().map(|c| c.norm()).collect();

        let mut peak_bin = 1;
        let mut peak_mag = magnitudes[1];
        for (k, &m) in magnitudes.iter().enumerate().take(half - 1).skip(2) {
            if m > peak_mag {
                peak_mag = m;
                peak_bin = k;
            }
        }

        let (y0, y1, y2) = (magnitudes[peak_bin - 1], magnitudes[peak_bin], magnitudes[peak_bin + 1]);
        let denom = y0 - 2.0 * y1 + y2;
        let delta = if denom.abs() > 1e-12 { (y0 - y2) / (2.0 * denom) } else { 0.0 };

        (peak_bin as f64 + delta) * self.sample_rate / FFT_SIZE as f64
    }

    /// Records a new (detected - expected) error and returns the current
    /// ring-mean Doppler shift estimate.
    pub fn observe(&mut self, block: &[f32], expected_freq: f64) -> f64 {
        let detected = self.detect_peak_freq(block);
        let error = detected - expected_freq;

        if self.errors.len() == RING_CAPACITY {
            self.errors.pop_front();
        }
        self.errors.push_back(error);

        self.errors.iter().sum::<f64>() / self.errors.len() as f64
    }

    /// Compensates `block` for the given Doppler shift estimate if it exceeds
    /// the 5 Hz threshold, otherwise returns the block unchanged.
    pub fn compensate(&self, block: &[f32], shift_hz: f64) -> Vec<f32> {
        if shift_hz.abs() <= COMPENSATION_THRESHOLD_HZ {
            return block.to_vec();
        }

        block
            .iter()
            .enumerate()
            .map(|(n, &x)| {
                let correction = (2.0 * std::f64::consts::PI * (-shift_hz) * n as f64 / self.sample_rate).cos();
                (x as f64 * correction) as f32
            })
            .collect()
    }
}
