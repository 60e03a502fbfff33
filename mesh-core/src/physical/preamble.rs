//! Preamble chirp generation and correlation-based detection (spec §4.1).

use crate::config::{BandConfig, TimingConfig};

const PREAMBLE_AMPLITUDE: f64 = 0.8;
/// Minimum normalised correlation to count the preamble as "found".
pub const CORRELATION_THRESHOLD: f64 = 0.3;

/// Generates the reference preamble: a linear chirp from `base_freq - 500`
/// to `base_freq + bandwidth + 500` Hz over `preamble_duration` seconds.
pub fn generate_preamble(band: &BandConfig, timing: &TimingConfig) -> Vec<f32> {
    let n = timing.preamble_samples();
    let f_start = band.preamble_low_freq();
    let f_end = band.preamble_high_freq();
    let sample_rate = timing.sample_rate as f64;

    (0..n)
        .map(|i| {
            let frac = i as f64 / n as f64;
            let freq = f_start + (f_end - f_start) * frac;
            (PREAMBLE_AMPLITUDE * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate).sin()) as f32
        })
        .collect()
}

/// Result of sliding the reference chirp across `samples`.
pub struct PreambleMatch {
    pub offset: usize,
    pub correlation: f64,
}

/// Slides a `preamble_samples`-long window across `samples` in 1 ms steps,
/// scoring each offset by normalised cross-correlation with the reference
/// chirp. Subsampling by 4 keeps this cheap enough for real-time use.
pub fn find_preamble(samples: &[f32], reference: &[f32], sample_rate: usize) -> Option<PreambleMatch> {
    let window_len = reference.len();
    if samples.len() < window_len {
        return None;
    }

    let step = (sample_rate / 1000).max(1);
    let subsample = 4usize;

    let ref_energy: f64 = reference.iter().step_by(subsample).map(|&s| (s as f64).powi(2)).sum();
    if ref_energy == 0.0 {
        return None;
    }

    let mut best = PreambleMatch {
        offset: 0,
        correlation: f64::MIN,
    };

    let mut offset = 0;
    while offset + window_len <= samples.len() {
        let window = &samples[offset..offset + window_len];

        let mut dot = 0.0f64;
        let mut win_energy = 0.0f64;
        let mut i = 0;
        while i < window_len {
            let w = window[i] as f64;
            let r = reference[i] as f64;
            dot += w * r;
            win_energy += w * w;
            i += subsample;
        }

        let denom = (win_energy * ref_energy).sqrt();
        let correlation = if denom > 0.0 { dot / denom } else { 0.0 };

        if correlation > best.correlation {
            best = PreambleMatch { offset, correlation };
        }

        offset += step;
    }

    if best.correlation >= CORRELATION_THRESHOLD {
        Some(best)
    } else {
        None
    }
}
