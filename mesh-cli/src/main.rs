mod config;
mod logging;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use config::CliConfig;
use logging::{FrameRoundTripEvent, LogEvent, StructuredLogger, SummaryEvent};
use mesh_core::encoding::{decode_frame, encode_message, reassemble, MessageType};
use mesh_core::physical::modulate;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Acoustic mesh networking loopback demo", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose diagnostic output
    #[arg(short, long)]
    verbose: bool,

    /// Output audio to WAV file (overrides config)
    #[arg(short = 'w', long)]
    wav_output: Option<PathBuf>,

    /// Message to encode (overrides config)
    #[arg(short = 'm', long)]
    message: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let mut config = if let Some(config_path) = &args.config {
        CliConfig::from_file(config_path).wrap_err_with(|| format!("Failed to load config from {}", config_path))?
    } else {
        CliConfig::default()
    };

    if let Some(wav_path) = args.wav_output {
        config.demo.wav_output = Some(wav_path);
    }
    if let Some(message) = args.message {
        config.demo.message = message;
    }

    let mut logger = StructuredLogger::new(config.logging.clone())?;

    logger.log(LogEvent::Info {
        message: format!(
            "device {:02x?} (\"{}\") starting loopback demo with message: \"{}\"",
            config.device.id, config.device.name, config.demo.message
        ),
    })?;

    let band = config.band.to_band_config();
    let timing = config.timing;
    let fec = config.fec;

    let payload = config.demo.message.as_bytes().to_vec();
    let wire_frames = encode_message(MessageType::Data, &payload, &fec)
        .wrap_err("failed to fragment/FEC-encode/frame the demo message")?;

    logger.log(LogEvent::Info {
        message: format!("encoded message into {} on-wire fragment(s)", wire_frames.len()),
    })?;

    let mut all_audio = Vec::new();
    let mut recovered_frames = Vec::new();
    let mut total_corrected_errors = 0usize;

    let progress = indicatif::ProgressBar::new(wire_frames.len() as u64);
    progress.set_style(
        indicatif::ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} fragments")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
    );

    for (i, wire_bytes) in wire_frames.iter().enumerate() {
        progress.inc(1);
        let samples = modulate(wire_bytes, &band, &timing);
        all_audio.extend_from_slice(&samples);

        match mesh_core::physical::demodulate(&samples, &band, &timing) {
            Ok(demodulated) => match decode_frame(&demodulated.data, &fec) {
                Ok((frame, corrected)) => {
                    total_corrected_errors += corrected;
                    logger.log(LogEvent::FrameRoundTrip(FrameRoundTripEvent {
                        timestamp: chrono::Utc::now(),
                        fragment_index: i,
                        message_type: frame.message_type.to_string(),
                        sequence: frame.sequence,
                        payload_len: frame.payload.len(),
                        corrected_errors: corrected,
                        demod_confidence: demodulated.confidence,
                    }))?;
                    recovered_frames.push(frame);
                }
                Err(err) => {
                    logger.log(LogEvent::Warn {
                        message: format!("fragment {i} failed to decode: {err}"),
                    })?;
                }
            },
            Err(err) => {
                logger.log(LogEvent::Warn {
                    message: format!("fragment {i} failed to demodulate: {err}"),
                })?;
            }
        }
    }
    progress.finish_and_clear();

    if let Some(wav_path) = &config.demo.wav_output {
        write_wav(&all_audio, timing.sample_rate as u32, wav_path)
            .wrap_err_with(|| format!("failed to write WAV output to {}", wav_path.display()))?;
        logger.log(LogEvent::Info {
            message: format!(
                "wrote {} samples ({:.2}s) to {}",
                all_audio.len(),
                all_audio.len() as f64 / timing.sample_rate as f64,
                wav_path.display()
            ),
        })?;
    }

    let recovered_message = reassemble(&recovered_frames)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_else(|err| format!("<reassembly failed: {err}>"));

    logger.log(LogEvent::Summary(SummaryEvent {
        timestamp: chrono::Utc::now(),
        duration_secs: logger.elapsed(),
        fragments_sent: wire_frames.len(),
        fragments_recovered: recovered_frames.len(),
        total_corrected_errors,
        recovered_message: recovered_message.clone(),
    }))?;

    if args.verbose {
        logger.log(LogEvent::Info {
            message: format!("recovered message bytes: {:?}", recovered_message.as_bytes()),
        })?;
    }

    Ok(())
}

fn write_wav(samples: &[f32], sample_rate: u32, path: &PathBuf) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
