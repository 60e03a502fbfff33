//! On-wire message type codes.

use std::fmt;

/// One-byte message type field at frame offset 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Beacon,
    Data,
    Ack,
    Nack,
    Discovery,
    SlotRequest,
    SlotGrant,
    StreamStart,
    StreamData,
    StreamEnd,
    /// Reserved range 0x08-0x0A (key exchange family) or any unrecognised code.
    Reserved(u8),
}

impl MessageType {
    pub fn to_opcode(self) -> u8 {
        match self {
            MessageType::Beacon => 0x01,
            MessageType::Data => 0x02,
            MessageType::Ack => 0x03,
            MessageType::Nack => 0x04,
            MessageType::Discovery => 0x05,
            MessageType::SlotRequest => 0x06,
            MessageType::SlotGrant => 0x07,
            MessageType::StreamStart => 0x0B,
            MessageType::StreamData => 0x0C,
            MessageType::StreamEnd => 0x0D,
            MessageType::Reserved(code) => code,
        }
    }

    pub fn from_opcode(code: u8) -> Self {
        match code {
            0x01 => MessageType::Beacon,
            0x02 => MessageType::Data,
            0x03 => MessageType::Ack,
            0x04 => MessageType::Nack,
            0x05 => MessageType::Discovery,
            0x06 => MessageType::SlotRequest,
            0x07 => MessageType::SlotGrant,
            0x0B => MessageType::StreamStart,
            0x0C => MessageType::StreamData,
            0x0D => MessageType::StreamEnd,
            other => MessageType::Reserved(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Beacon => "BEACON",
            MessageType::Data => "DATA",
            MessageType::Ack => "ACK",
            MessageType::Nack => "NACK",
            MessageType::Discovery => "DISCOVERY",
            MessageType::SlotRequest => "SLOT_REQUEST",
            MessageType::SlotGrant => "SLOT_GRANT",
            MessageType::StreamStart => "STREAM_START",
            MessageType::StreamData => "STREAM_DATA",
            MessageType::StreamEnd => "STREAM_END",
            MessageType::Reserved(_) => "RESERVED",
        }
    }

    /// Default priority (§4.4): beacons mid, acks high, everything else mid.
    pub fn default_priority(&self) -> u8 {
        match self {
            MessageType::Ack => 10,
            MessageType::Beacon => 5,
            _ => 5,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_roundtrip() {
        for mt in [
            MessageType::Beacon,
            MessageType::Data,
            MessageType::Ack,
            MessageType::Nack,
            MessageType::Discovery,
            MessageType::SlotRequest,
            MessageType::SlotGrant,
            MessageType::StreamStart,
            MessageType::StreamData,
            MessageType::StreamEnd,
        ] {
            assert_eq!(MessageType::from_opcode(mt.to_opcode()), mt);
        }
    }

    #[test]
    fn reserved_range_roundtrips() {
        for code in 0x08..=0x0A {
            assert_eq!(MessageType::from_opcode(code), MessageType::Reserved(code));
        }
    }
}
