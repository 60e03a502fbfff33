//! Acoustic mesh networking core.
//!
//! A layered stack that turns application bytes into FSK audio and back:
//! framing and forward error correction (`encoding`), tone modulation and
//! demodulation (`physical`), microphone/speaker signal conditioning
//! (`signal`), and time-slotted medium access (`mac`). Audio transport,
//! peer discovery, and mesh routing are treated as external collaborators
//! (`collaborators`) rather than implemented here.

pub mod beacon;
pub mod collaborators;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod logging;
pub mod mac;
pub mod physical;
pub mod signal;

pub use errors::{MacError, MeshError, Result};
