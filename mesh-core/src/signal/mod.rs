//! Signal conditioning: bandpass, spectral denoise, echo cancellation,
//! Doppler detection/compensation, and AGC (spec §4.2).

pub mod agc;
pub mod bandpass;
pub mod denoise;
pub mod doppler;
pub mod echo;
pub mod pipeline;

pub use agc::Agc;
pub use bandpass::Bandpass;
pub use denoise::SpectralDenoiser;
pub use doppler::DopplerTracker;
pub use echo::EchoCanceller;
pub use pipeline::{BlockFeatures, SignalConditioner};
