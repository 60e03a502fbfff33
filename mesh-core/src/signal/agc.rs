//! Automatic gain control (spec §4.2).

const TARGET_LEVEL: f64 = 0.3;
const ATTACK: f64 = 0.1;
const RELEASE: f64 = 0.01;
const MIN_GAIN: f64 = 0.1;
const MAX_GAIN: f64 = 10.0;

pub struct Agc {
    gain: f64,
}

impl Agc {
    pub fn new() -> Self {
        Self { gain: 1.0 }
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn process(&mut self, block: &[f32]) -> Vec<f32> {
        let rms = {
            let sum_sq: f64 = block.iter().map(|&s| (s as f64).powi(2)).sum();
            (sum_sq / block.len().max(1) as f64).sqrt()
        };

        let target_gain = if rms > 0.0 { TARGET_LEVEL / rms } else { self.gain };
        let beta = if target_gain < self.gain { ATTACK } else { RELEASE };
        self.gain = (self.gain * (1.0 - beta) + target_gain * beta).clamp(MIN_GAIN, MAX_GAIN);

        block.iter().map(|&s| (self.gain * s as f64) as f32).collect()
    }
}

impl Default for Agc {
    fn default() -> Self {
        Self::new()
    }
}
