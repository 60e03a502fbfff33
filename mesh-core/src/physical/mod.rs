//! Physical layer: M-ary FSK modulation/demodulation over a fixed band plan
//! (spec §4.1).

pub mod demodulation;
pub mod modulation;
pub mod preamble;

pub use demodulation::{demodulate, Demodulated};
pub use modulation::{bytes_to_symbols, modulate, symbols_to_bytes};
pub use preamble::generate_preamble;
