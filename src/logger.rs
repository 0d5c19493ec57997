use serde::Serialize;
use std::path::Path;

use crate::batch::{Outcome, Report, Summary};
use crate::cli::OutputFormat;
use crate::metadata::PresetMetadata;

/// CLI front end for the batch transcript: plain text lines or one JSON
/// event per line, with a quiet mode that keeps failures and the summary.
pub struct Logger {
    quiet: bool,
    format: OutputFormat,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl Logger {
    pub fn new(quiet: bool, format: OutputFormat) -> Self {
        Self { quiet, format }
    }

    /// Announce the fixed artist/genre before the run starts.
    pub fn announce_presets(&self, preset: &PresetMetadata) {
        if self.quiet {
            return;
        }
        let data = serde_json::json!({
            "artist": preset.artist,
            "genre": preset.genre,
        });
        self.output(
            "presets",
            &format!("Preset metadata: artist={}, genre={}", preset.artist, preset.genre),
            Some(data),
        );
    }

    /// Quiet mode drops per-file lines but never hides failures.
    fn should_report(&self, outcome: &Outcome) -> bool {
        !self.quiet || matches!(outcome, Outcome::Failed { .. })
    }

    fn output(&self, event_type: &str, message: &str, data: Option<serde_json::Value>) {
        match self.format {
            OutputFormat::Json => {
                let event = JsonEvent {
                    event_type,
                    message,
                    data,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{}", json);
                }
            }
            OutputFormat::Text => {
                println!("{}", message);
            }
        }
    }
}

impl Report for Logger {
    fn begin(&self, directory: &Path) {
        if self.quiet {
            return;
        }
        let data = serde_json::json!({ "directory": directory.display().to_string() });
        self.output(
            "begin",
            &format!("Processing directory: {}", directory.display()),
            Some(data),
        );
    }

    fn report(&self, outcome: &Outcome) {
        if !self.should_report(outcome) {
            return;
        }
        let data = match outcome {
            Outcome::Failed { file, reason } => {
                serde_json::json!({ "file": file, "reason": reason })
            }
            other => serde_json::json!({ "file": other.file() }),
        };
        self.output(outcome.kind(), &outcome.message(), Some(data));
    }

    fn finish(&self, summary: &Summary) {
        let data = serde_json::json!({
            "processed": summary.processed,
            "skipped": summary.skipped,
        });
        self.output("summary", &summary.message(), Some(data));
    }
}
