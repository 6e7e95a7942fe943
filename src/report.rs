//! Plain-text cleanup report.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDateTime;
use log::info;

use crate::results::ResultStore;

pub const REPORT_HEADER: &str = "=== LOG CLEANUP REPORT ===";
pub const REPORT_PREFIX: &str = "log_cleaner_report_";
pub const REPORT_EXTENSION: &str = "dat";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to create report {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to write report {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Writes a [`ResultStore`] to `<dir>/log_cleaner_report_<YYYYMMDD>_<HHMMSS>.dat`.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Report path for a given capture time. Second granularity.
    pub fn report_path(&self, captured_at: &NaiveDateTime) -> PathBuf {
        self.dir.join(file_name(captured_at))
    }

    /// Render and write the report. Returns the path written.
    pub fn write(&self, store: &ResultStore, captured_at: &NaiveDateTime) -> Result<PathBuf> {
        let path = self.report_path(captured_at);
        let mut file = File::create(&path).map_err(|source| ReportError::Create {
            path: path.clone(),
            source,
        })?;

        file.write_all(render(store, captured_at).as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| ReportError::Write {
                path: path.clone(),
                source,
            })?;

        info!("Report saved to {}", path.display());
        Ok(path)
    }
}

pub fn file_name(captured_at: &NaiveDateTime) -> String {
    format!(
        "{REPORT_PREFIX}{}.{REPORT_EXTENSION}",
        captured_at.format("%Y%m%d_%H%M%S")
    )
}

/// The full report text. Same store and timestamp, same bytes.
pub fn render(store: &ResultStore, captured_at: &NaiveDateTime) -> String {
    let mut out = format!(
        "{REPORT_HEADER}\nDate and time: {}\n\n",
        captured_at.format("%a %b %e %H:%M:%S %Y")
    );

    for (category, outcomes) in store.snapshot() {
        out.push_str(&format!("DIRECTORY: {category}\n"));
        for outcome in outcomes {
            let name = &outcome.entry_name;
            let line = if outcome.succeeded {
                format!("{name} - removed\n")
            } else {
                match outcome.reason.as_deref().filter(|r| !r.is_empty()) {
                    Some(reason) => format!("{name} - failed to remove ({reason})\n"),
                    None => format!("{name} - failed to remove\n"),
                }
            };
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}
