//! Error types for the mesh stack, one enum per subsystem unified under [`MeshError`].

use thiserror::Error;

/// Top-level error type for all mesh-core operations.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("physical layer error: {0}")]
    Physical(#[from] PhysicalError),

    #[error("signal conditioning error: {0}")]
    Signal(#[from] SignalError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("MAC error: {0}")]
    Mac(#[from] MacError),

    #[error("audio device unavailable: {0}")]
    AudioUnavailable(String),
}

/// Physical-layer (modulation/demodulation) errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PhysicalError {
    #[error("no preamble found (best correlation {best_correlation_milli} / 1000 < threshold)")]
    NoPreamble { best_correlation_milli: i32 },

    #[error("input buffer too short to contain a preamble")]
    BufferTooShort,

    #[error("empty symbol stream")]
    EmptySymbols,
}

/// Signal-conditioning errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SignalError {
    #[error("FFT size {size} is not a power of two")]
    InvalidFftSize { size: usize },

    #[error("filter design failed: {reason}")]
    FilterDesignFailed { reason: String },

    #[error("block length {actual} does not match expected {expected}")]
    BlockLengthMismatch { expected: usize, actual: usize },
}

/// Framing / FEC errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodingError {
    #[error("frame too short: {len} bytes (minimum 12)")]
    FrameTooShort { len: usize },

    #[error("bad magic bytes: expected AC4D, got {0:02X}{1:02X}")]
    BadMagic(u8, u8),

    #[error("truncated frame: header declares {declared} payload bytes, buffer has {available}")]
    Truncated { declared: usize, available: usize },

    #[error("CRC mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },

    #[error("payload length {len} exceeds max_payload_size {max}")]
    PayloadTooLong { len: usize, max: usize },

    #[error("missing fragment(s): have {have} of {expected}")]
    MissingFragment { have: usize, expected: usize },

    #[error("reassembly buffer has no first fragment")]
    NoFirstFragment,

    #[error("reassembly buffer has no last fragment")]
    NoLastFragment,
}

/// Medium-access-control errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MacError {
    #[error("no route to target {0:02x?}")]
    NoRoute([u8; 4]),

    #[error("acknowledgement timeout after {retries} retries")]
    AckTimeout { retries: u32 },

    #[error("no slots available: requested {requested}, free {free}")]
    NoSlotsAvailable { requested: usize, free: usize },

    #[error("transmit queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },
}

/// Result type alias for mesh-core operations.
pub type Result<T> = std::result::Result<T, MeshError>;
