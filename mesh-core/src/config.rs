//! Configuration types for the mesh stack: band/timing choices for the physical
//! layer, and parameters for FEC and the MAC scheduler.

use serde::{Deserialize, Serialize};

/// Frequency plan for M-ary FSK: which tones are used and how they're spaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    pub base_freq: f64,
    pub freq_spacing: f64,
    pub num_frequencies: usize,
    pub bandwidth: f64,
}

impl BandConfig {
    /// Ultrasonic preset: inaudible to most adults, 16-ary.
    pub fn ultrasonic() -> Self {
        Self {
            base_freq: 18_000.0,
            freq_spacing: 100.0,
            num_frequencies: 16,
            bandwidth: 1_600.0,
        }
    }

    /// Audible preset: lower tones, 8-ary, for hardware with a narrow passband.
    pub fn audible() -> Self {
        Self {
            base_freq: 1_000.0,
            freq_spacing: 200.0,
            num_frequencies: 8,
            bandwidth: 1_600.0,
        }
    }

    pub fn frequency(&self, symbol: usize) -> f64 {
        self.base_freq + symbol as f64 * self.freq_spacing
    }

    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.num_frequencies).map(|i| self.frequency(i)).collect()
    }

    pub fn bits_per_symbol(&self) -> u32 {
        self.num_frequencies.trailing_zeros()
    }

    pub fn preamble_low_freq(&self) -> f64 {
        self.base_freq - 500.0
    }

    pub fn preamble_high_freq(&self) -> f64 {
        self.base_freq + self.bandwidth + 500.0
    }
}

/// Sample-rate and slot-timing choices, shared by modulator and demodulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub sample_rate: usize,
    pub symbol_duration: f64,
    pub guard_interval: f64,
    pub preamble_duration: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            symbol_duration: 0.01,
            guard_interval: 0.002,
            preamble_duration: 0.1,
        }
    }
}

impl TimingConfig {
    pub fn samples_per_symbol(&self) -> usize {
        (self.sample_rate as f64 * self.symbol_duration) as usize
    }

    pub fn guard_samples(&self) -> usize {
        (self.sample_rate as f64 * self.guard_interval) as usize
    }

    pub fn preamble_samples(&self) -> usize {
        (self.sample_rate as f64 * self.preamble_duration) as usize
    }

    pub fn slot_stride(&self) -> usize {
        self.samples_per_symbol() + self.guard_samples()
    }
}

/// Forward-error-correction parameters: replication factor is fixed at 3 (see
/// `encoding::fec`), only the interleaver depth is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FecConfig {
    pub interleave_depth: usize,
}

impl Default for FecConfig {
    fn default() -> Self {
        Self { interleave_depth: 8 }
    }
}

/// TDMA timing and slot-assignment parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacConfig {
    pub frame_duration_ms: u64,
    pub slots_per_frame: usize,
    pub ack_timeout: std::time::Duration,
    pub max_retries: u32,
}

impl MacConfig {
    pub fn slot_duration_ms(&self) -> u64 {
        self.frame_duration_ms / self.slots_per_frame as u64
    }
}

impl Default for MacConfig {
    fn default() -> Self {
        Self {
            frame_duration_ms: 1_000,
            slots_per_frame: 20,
            ack_timeout: std::time::Duration::from_secs(2),
            max_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ultrasonic_frequencies() {
        let band = BandConfig::ultrasonic();
        assert_eq!(band.bits_per_symbol(), 4);
        assert_eq!(band.frequency(0), 18_000.0);
        assert_eq!(band.frequency(3), 18_300.0);
        assert_eq!(band.frequency(12), 19_200.0);
    }

    #[test]
    fn audible_bits_per_symbol() {
        let band = BandConfig::audible();
        assert_eq!(band.bits_per_symbol(), 3);
        assert_eq!(band.frequencies().len(), 8);
    }

    #[test]
    fn timing_derivations() {
        let timing = TimingConfig::default();
        assert_eq!(timing.samples_per_symbol(), 441);
        assert_eq!(timing.guard_samples(), 88);
        assert_eq!(timing.preamble_samples(), 4410);
    }

    #[test]
    fn slot_duration_divides_frame() {
        let mac = MacConfig::default();
        assert_eq!(mac.slot_duration_ms(), 50);
    }
}
