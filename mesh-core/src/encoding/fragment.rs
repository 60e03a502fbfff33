//! Fragmentation and reassembly (spec §4.3).

use super::fec;
use super::frame::{Frame, FLAG_FIRST_FRAGMENT, FLAG_MORE_FRAGMENTS, MAX_PAYLOAD_SIZE};
use super::message::MessageType;
use crate::config::FecConfig;
use crate::errors::EncodingError;

/// Splits `payload` into frames sized so each fragment's payload still fits
/// under `MAX_PAYLOAD_SIZE` *after* FEC encoding (`mod::encode_message` wraps
/// the FEC output, not the raw chunk, in the on-wire `Frame`), sequenced from
/// zero with fragment flags set per spec §4.3.
pub fn fragment(message_type: MessageType, payload: &[u8], fec: &FecConfig) -> Vec<Frame> {
    let chunk_size = fec::max_fragment_payload(fec.interleave_depth, MAX_PAYLOAD_SIZE).max(1);

    if payload.is_empty() {
        return vec![Frame::new(message_type, FLAG_FIRST_FRAGMENT, 0, Vec::new()).expect("empty payload always fits")];
    }

    let chunks: Vec<&[u8]> = payload.chunks(chunk_size).collect();
    let n = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut flags = 0u8;
            if i < n - 1 {
                flags |= FLAG_MORE_FRAGMENTS;
            }
            if i == 0 {
                flags |= FLAG_FIRST_FRAGMENT;
            }
            Frame::new(message_type, flags, i as u16, chunk.to_vec()).expect("chunk respects the FEC-effective fragment cap")
        })
        .collect()
}

/// Reassembles a set of received fragments (need not arrive in order) back
/// into the original payload.
pub fn reassemble(fragments: &[Frame]) -> Result<Vec<u8>, EncodingError> {
    let mut sorted: Vec<&Frame> = fragments.iter().collect();
    sorted.sort_by_key(|f| f.sequence);

    if !sorted.iter().any(|f| f.is_first_fragment()) {
        return Err(EncodingError::NoFirstFragment);
    }
    if !sorted.iter().any(|f| !f.more_fragments()) {
        return Err(EncodingError::NoLastFragment);
    }

    let first_seq = sorted.first().map(|f| f.sequence).unwrap_or(0);
    let last_seq = sorted.last().map(|f| f.sequence).unwrap_or(0);
    let expected = (last_seq - first_seq + 1) as usize;
    if sorted.len() != expected {
        return Err(EncodingError::MissingFragment {
            have: sorted.len(),
            expected,
        });
    }

    let mut out = Vec::new();
    for frame in sorted {
        out.extend_from_slice(&frame.payload);
    }
    Ok(out)
}
