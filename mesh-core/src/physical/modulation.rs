//! Byte<->symbol mapping and FSK modulation (spec §4.1).

use super::preamble::generate_preamble;
use crate::config::{BandConfig, TimingConfig};

/// Maps bytes to symbols. For M=16 each byte yields two nibble symbols
/// (high nibble first); for other M, bits are packed MSB-first across byte
/// boundaries with a final partial group left-padded with zeros.
pub fn bytes_to_symbols(data: &[u8], band: &BandConfig) -> Vec<usize> {
    let bits_per_symbol = band.bits_per_symbol();

    if bits_per_symbol == 4 {
        let mut symbols = Vec::with_capacity(data.len() * 2);
        for &b in data {
            symbols.push((b >> 4) as usize);
            symbols.push((b & 0x0F) as usize);
        }
        return symbols;
    }

    let mut bits = Vec::with_capacity(data.len() * 8);
    for &b in data {
        for i in (0..8).rev() {
            bits.push((b >> i) & 1);
        }
    }

    bits.chunks(bits_per_symbol as usize)
        .map(|chunk| chunk.iter().fold(0usize, |value, &bit| (value << 1) | bit as usize))
        .collect()
}

/// Inverse of [`bytes_to_symbols`]. For non-power-of-two-aligned inputs the
/// final partial group's padding bits are discarded.
pub fn symbols_to_bytes(symbols: &[usize], band: &BandConfig) -> Vec<u8> {
    let bits_per_symbol = band.bits_per_symbol();

    if bits_per_symbol == 4 {
        let mut out = Vec::with_capacity(symbols.len() / 2);
        for pair in symbols.chunks(2) {
            let hi = pair[0] as u8 & 0x0F;
            let lo = pair.get(1).copied().unwrap_or(0) as u8 & 0x0F;
            out.push((hi << 4) | lo);
        }
        return out;
    }

    let mut bits = Vec::with_capacity(symbols.len() * bits_per_symbol as usize);
    for &s in symbols {
        for i in (0..bits_per_symbol).rev() {
            bits.push(((s >> i) & 1) as u8);
        }
    }

    bits.chunks(8)
        .filter(|chunk| chunk.len() == 8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
        .collect()
}

/// Modulates `data` into a real-valued sample stream: preamble chirp followed
/// by one Hann-windowed tone burst per symbol, separated by guard silence.
pub fn modulate(data: &[u8], band: &BandConfig, timing: &TimingConfig) -> Vec<f32> {
    let preamble = generate_preamble(band, timing);
    let symbols = bytes_to_symbols(data, band);

    let samples_per_symbol = timing.samples_per_symbol();
    let guard_samples = timing.guard_samples();
    let sample_rate = timing.sample_rate as f64;

    let mut out = Vec::with_capacity(preamble.len() + symbols.len() * (samples_per_symbol + guard_samples));
    out.extend_from_slice(&preamble);

    for &symbol in &symbols {
        let freq = band.frequency(symbol);
        for j in 0..samples_per_symbol {
            let window = 0.5 * (1.0 - (2.0 * std::f64::consts::PI * j as f64 / samples_per_symbol as f64).cos());
            let phase = 2.0 * std::f64::consts::PI * freq * j as f64 / sample_rate;
            out.push((window * phase.sin()) as f32);
        }
        out.extend(std::iter::repeat(0.0f32).take(guard_samples));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulate_length_matches_formula() {
        let band = BandConfig::ultrasonic();
        let timing = TimingConfig::default();
        let data = vec![0x3Cu8];
        let symbols = bytes_to_symbols(&data, &band);
        let expected = timing.preamble_samples() + symbols.len() * (timing.samples_per_symbol() + timing.guard_samples());
        assert_eq!(modulate(&data, &band, &timing).len(), expected);
    }

    #[test]
    fn nibble_mapping_for_m16() {
        let band = BandConfig::ultrasonic();
        let symbols = bytes_to_symbols(&[0x3C], &band);
        assert_eq!(symbols, vec![0x3, 0xC]);
    }

    #[test]
    fn symbol_frequencies_for_0x3c() {
        let band = BandConfig::ultrasonic();
        let symbols = bytes_to_symbols(&[0x3C], &band);
        let freqs: Vec<f64> = symbols.iter().map(|&s| band.frequency(s)).collect();
        assert_eq!(freqs, vec![18_300.0, 19_200.0]);
    }

    #[test]
    fn bit_packing_roundtrip_for_m8() {
        let band = BandConfig::audible();
        let data = b"hi!".to_vec();
        let symbols = bytes_to_symbols(&data, &band);
        let recovered = symbols_to_bytes(&symbols, &band);
        assert_eq!(recovered, data);
    }

    #[test]
    fn nibble_roundtrip_for_m16() {
        let band = BandConfig::ultrasonic();
        let data = vec![0x00, 0xFF, 0x3C, 0xA5];
        let symbols = bytes_to_symbols(&data, &band);
        let recovered = symbols_to_bytes(&symbols, &band);
        assert_eq!(recovered, data);
    }
}
