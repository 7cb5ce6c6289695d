//! JSONL file writer for forecast outcomes.
//!
//! Each record is a single JSON line with a `type` field and `timestamp`,
//! appended to the file via a buffered writer.

use forecast_application::QuestionReport;
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Outcome log that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlOutcomeLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlOutcomeLog {
    /// Open the log for appending, creating the file and parent directories.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create outcome log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open outcome log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the result of one question
    pub fn record_report(&self, report: &QuestionReport) {
        let (event_type, mut payload) = match &report.result {
            Ok(outcome) => match serde_json::to_value(outcome) {
                Ok(value) => ("forecast_outcome", value),
                Err(e) => {
                    warn!("Could not serialize outcome {}: {}", report.question_id, e);
                    return;
                }
            },
            Err(e) => (
                "forecast_failed",
                json!({
                    "question_id": report.question_id,
                    "title": report.title,
                    "error": e.to_string(),
                }),
            ),
        };

        if let (Some(submission), Value::Object(map)) = (&report.submission, &mut payload) {
            let submitted = match submission {
                Ok(()) => json!({ "accepted": true }),
                Err(e) => json!({ "accepted": false, "error": e.to_string() }),
            };
            map.insert("submission".to_string(), submitted);
        }

        self.record(event_type, payload);
    }

    /// Append an arbitrary event
    pub fn record(&self, event_type: &str, payload: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let Value::Object(mut map) = payload {
            map.insert("type".to_string(), Value::String(event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        } else {
            json!({
                "type": event_type,
                "timestamp": timestamp,
                "data": payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlOutcomeLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
