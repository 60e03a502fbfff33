//! Structured logging for the loopback demo: one JSON/logfmt/pretty line per
//! frame processed, plus a session summary.

use crate::config::{LogFormat, LogTarget, LoggingConfig};
use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Structured log event types emitted by the demo harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    /// One transmitted-and-received frame round trip.
    FrameRoundTrip(FrameRoundTripEvent),

    /// End-of-run summary.
    Summary(SummaryEvent),

    Info { message: String },
    Warn { message: String },
    Error { message: String, details: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRoundTripEvent {
    pub timestamp: DateTime<Utc>,
    pub fragment_index: usize,
    pub message_type: String,
    pub sequence: u16,
    pub payload_len: usize,
    pub corrected_errors: usize,
    pub demod_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEvent {
    pub timestamp: DateTime<Utc>,
    pub duration_secs: f64,
    pub fragments_sent: usize,
    pub fragments_recovered: usize,
    pub total_corrected_errors: usize,
    pub recovered_message: String,
}

/// Logger that renders [`LogEvent`]s in the configured format and writes
/// them to the configured target.
pub struct StructuredLogger {
    config: LoggingConfig,
    writer: Box<dyn Write + Send>,
    start_time: DateTime<Utc>,
}

impl StructuredLogger {
    pub fn new(config: LoggingConfig) -> Result<Self> {
        let writer: Box<dyn Write + Send> = match &config.target {
            LogTarget::Stdout => Box::new(io::stdout()),
            LogTarget::Stderr => Box::new(io::stderr()),
            LogTarget::File => {
                let path = config
                    .file_path
                    .as_ref()
                    .ok_or_else(|| color_eyre::eyre::eyre!("File path required for file logging"))?;
                Box::new(BufWriter::new(File::create(path)?))
            }
        };

        Ok(Self {
            config,
            writer,
            start_time: Utc::now(),
        })
    }

    pub fn log(&mut self, event: LogEvent) -> Result<()> {
        let output = match self.config.format {
            LogFormat::Json => self.format_json(&event)?,
            LogFormat::Logfmt => self.format_logfmt(&event),
            LogFormat::Pretty => self.format_pretty(&event),
        };

        writeln!(self.writer, "{}", output)?;
        self.writer.flush()?;
        Ok(())
    }

    fn format_json(&self, event: &LogEvent) -> Result<String> {
        Ok(serde_json::to_string(event)?)
    }

    fn format_logfmt(&self, event: &LogEvent) -> String {
        let ts = Utc::now().to_rfc3339();
        match event {
            LogEvent::FrameRoundTrip(e) => format!(
                "ts=\"{}\" type=frame fragment={} message_type={} seq={} payload_len={} corrected={} confidence={:.3}",
                ts, e.fragment_index, e.message_type, e.sequence, e.payload_len, e.corrected_errors, e.demod_confidence
            ),
            LogEvent::Summary(s) => format!(
                "ts=\"{}\" type=summary duration_secs={:.3} sent={} recovered={} corrected_total={}",
                ts, s.duration_secs, s.fragments_sent, s.fragments_recovered, s.total_corrected_errors
            ),
            LogEvent::Info { message } => format!("ts=\"{}\" level=info msg=\"{}\"", ts, message),
            LogEvent::Warn { message } => format!("ts=\"{}\" level=warn msg=\"{}\"", ts, message),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("ts=\"{}\" level=error msg=\"{}\" details=\"{}\"", ts, message, d),
                None => format!("ts=\"{}\" level=error msg=\"{}\"", ts, message),
            },
        }
    }

    fn format_pretty(&self, event: &LogEvent) -> String {
        let ts = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        match event {
            LogEvent::FrameRoundTrip(e) => format!(
                "[{}] FRAME[{}]: {} seq={} payload={}B corrected={} confidence={:.2}",
                ts, e.fragment_index, e.message_type, e.sequence, e.payload_len, e.corrected_errors, e.demod_confidence
            ),
            LogEvent::Summary(s) => format!(
                "[{}] SUMMARY ({:.2}s): sent={} recovered={} corrected_total={} message=\"{}\"",
                ts, s.duration_secs, s.fragments_sent, s.fragments_recovered, s.total_corrected_errors, s.recovered_message
            ),
            LogEvent::Info { message } => format!("[{}] INFO: {}", ts, message),
            LogEvent::Warn { message } => format!("[{}] WARN: {}", ts, message),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("[{}] ERROR: {} | {}", ts, message, d),
                None => format!("[{}] ERROR: {}", ts, message),
            },
        }
    }

    pub fn elapsed(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}
