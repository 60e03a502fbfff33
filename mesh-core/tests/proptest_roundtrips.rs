//! Property-based round-trip tests for the FEC codec, frame parser, and
//! byte<->symbol mapping (spec §7, §8).

use mesh_core::config::BandConfig;
use mesh_core::encoding::{decode_fec, encode_fec, Frame, MessageType};
use mesh_core::physical::{bytes_to_symbols, symbols_to_bytes};
use proptest::prelude::*;

proptest! {
    #[test]
    fn fec_roundtrip_holds_for_arbitrary_payloads(data in proptest::collection::vec(any::<u8>(), 0..64), depth in 3usize..16) {
        let encoded = encode_fec(&data, depth);
        let decoded = decode_fec(&encoded, depth);
        prop_assert_eq!(decoded.data, data);
        prop_assert_eq!(decoded.corrected_errors, 0);
    }

    #[test]
    fn fec_corrects_any_single_bit_flip_per_triple(data in proptest::collection::vec(any::<u8>(), 1..32), byte_index in 0usize..32, bit in 0u8..8) {
        let depth = 8;
        let mut encoded = encode_fec(&data, depth);
        if !encoded.is_empty() {
            let idx = byte_index % encoded.len();
            encoded[idx] ^= 1 << bit;
        }
        let decoded = decode_fec(&encoded, depth);
        prop_assert_eq!(decoded.data, data);
    }

    #[test]
    fn frame_roundtrip_holds_for_arbitrary_payloads(payload in proptest::collection::vec(any::<u8>(), 0..256), sequence in any::<u16>(), flags in any::<u8>()) {
        let frame = Frame::new(MessageType::Data, flags, sequence, payload.clone()).unwrap();
        let bytes = frame.to_bytes();
        let parsed = Frame::parse(&bytes).unwrap();
        prop_assert_eq!(parsed.payload, payload);
        prop_assert_eq!(parsed.sequence, sequence);
        prop_assert_eq!(parsed.flags, flags);
    }

    #[test]
    fn m16_symbol_mapping_roundtrips(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let band = BandConfig::ultrasonic();
        let symbols = bytes_to_symbols(&data, &band);
        let recovered = symbols_to_bytes(&symbols, &band);
        prop_assert_eq!(recovered, data);
    }
}
