//! Encoding layer: framing (magic/header/CRC-32), fragmentation/reassembly,
//! and majority-vote FEC with interleaving (spec §4.3).

pub mod crc32;
pub mod fec;
pub mod fragment;
pub mod frame;
pub mod message;

pub use crc32::crc32 as crc32_of;
pub use fec::{decode as decode_fec, encode as encode_fec, Decoded as FecDecoded};
pub use fragment::{fragment, reassemble};
pub use frame::Frame;
pub use message::MessageType;

use crate::config::FecConfig;
use crate::errors::EncodingError;

/// Fragments, FEC-encodes, and frames an application payload, ready for the
/// MAC layer to enqueue. Returns one on-wire frame per fragment.
pub fn encode_message(
    message_type: MessageType,
    payload: &[u8],
    fec: &FecConfig,
) -> Result<Vec<Vec<u8>>, EncodingError> {
    fragment(message_type, payload, fec)
        .into_iter()
        .map(|fragment_frame| {
            let fec_payload = encode_fec(&fragment_frame.payload, fec.interleave_depth);
            let framed = Frame::new(
                fragment_frame.message_type,
                fragment_frame.flags,
                fragment_frame.sequence,
                fec_payload,
            )?;
            Ok(framed.to_bytes())
        })
        .collect()
}

/// Parses and FEC-decodes a single received on-wire frame, returning the
/// recovered fragment payload and the number of FEC-corrected byte errors.
pub fn decode_frame(bytes: &[u8], fec: &FecConfig) -> Result<(Frame, usize), EncodingError> {
    let frame = Frame::parse(bytes)?;
    let decoded = decode_fec(&frame.payload, fec.interleave_depth);
    let recovered = Frame {
        payload: decoded.data,
        ..frame
    };
    Ok((recovered, decoded.corrected_errors))
}
