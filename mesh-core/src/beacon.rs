//! Beacon payload: a compact, self-describing announcement a device
//! broadcasts so neighbours can discover it (spec §9).

use crate::errors::EncodingError;

const MAX_NAME_LEN: usize = 32;

/// Periodic presence announcement. `device_id` matches the identifier used
/// by the MAC layer's slot table and contention hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconPayload {
    pub device_id: [u8; 4],
    pub name: String,
    pub timestamp: u64,
    pub sequence: u16,
}

impl BeaconPayload {
    pub fn new(device_id: [u8; 4], name: impl Into<String>, timestamp: u64, sequence: u16) -> Self {
        let mut name = name.into();
        name.truncate(MAX_NAME_LEN);
        Self {
            device_id,
            name,
            timestamp,
            sequence,
        }
    }

    /// Encodes as: 4-byte device id, 1-byte name length, name bytes,
    /// 8-byte big-endian timestamp, 2-byte big-endian sequence.
    pub fn to_bytes(&self) -> Vec<u8> {
        let name_bytes = self.name.as_bytes();
        let mut out = Vec::with_capacity(4 + 1 + name_bytes.len() + 8 + 2);
        out.extend_from_slice(&self.device_id);
        out.push(name_bytes.len() as u8);
        out.extend_from_slice(name_bytes);
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.sequence.to_be_bytes());
        out
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.len() < 5 {
            return Err(EncodingError::FrameTooShort { len: bytes.len() });
        }

        let device_id = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let name_len = bytes[4] as usize;
        let name_end = 5 + name_len;
        let tail_start = name_end;
        let total_len = tail_start + 10;

        if bytes.len() < total_len {
            return Err(EncodingError::Truncated {
                declared: total_len,
                available: bytes.len(),
            });
        }

        let name = String::from_utf8_lossy(&bytes[5..name_end]).into_owned();
        let timestamp = u64::from_be_bytes(bytes[tail_start..tail_start + 8].try_into().unwrap());
        let sequence = u16::from_be_bytes(bytes[tail_start + 8..tail_start + 10].try_into().unwrap());

        Ok(Self {
            device_id,
            name,
            timestamp,
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips() {
        let beacon = BeaconPayload::new([1, 2, 3, 4], "node-a", 1_700_000_000, 42);
        let bytes = beacon.to_bytes();
        let parsed = BeaconPayload::parse(&bytes).unwrap();
        assert_eq!(parsed, beacon);
    }

    #[test]
    fn name_truncated_to_max_len() {
        let long_name = "x".repeat(64);
        let beacon = BeaconPayload::new([0, 0, 0, 0], long_name, 0, 0);
        assert_eq!(beacon.name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn rejects_truncated_buffer() {
        let beacon = BeaconPayload::new([9, 9, 9, 9], "n", 123, 1);
        let bytes = beacon.to_bytes();
        let err = BeaconPayload::parse(&bytes[..bytes.len() - 1]);
        assert!(matches!(err, Err(EncodingError::Truncated { .. })));
    }

    #[test]
    fn empty_name_roundtrips() {
        let beacon = BeaconPayload::new([1, 1, 1, 1], "", 5, 5);
        let bytes = beacon.to_bytes();
        let parsed = BeaconPayload::parse(&bytes).unwrap();
        assert_eq!(parsed.name, "");
    }
}
