//! Per-file outcomes and the batch summary.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stage::Stage;

/// How one file's pipeline ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// All stages succeeded and the stabilized output exists.
    Completed,
    /// `stage` failed; later stages were not run.
    Failed { stage: Stage, diagnostic: String },
}

/// Result of running the pipeline for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub file: String,
    pub input: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    /// Stabilized deliverable, present only when completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub elapsed_secs: f64,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Completed
    }
}

/// Aggregate of a whole batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// A report for a batch that found nothing to do.
    pub fn empty(input_dir: PathBuf, output_dir: PathBuf, started_at: DateTime<Utc>) -> Self {
        Self {
            input_dir,
            output_dir,
            started_at,
            finished_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Human-readable summary printed at the end of a run.
impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No video files found in {}", self.input_dir.display());
        }

        let ok = self.succeeded().count();
        writeln!(
            f,
            "Processed {} file(s): {} succeeded, {} failed",
            self.processed(),
            ok,
            self.processed() - ok
        )?;

        for outcome in &self.outcomes {
            match &outcome.status {
                FileStatus::Completed => writeln!(f, "  ✓ {}", outcome.file)?,
                FileStatus::Failed { stage, diagnostic } => {
                    writeln!(f, "  ✗ {} failed at {stage}: {diagnostic}", outcome.file)?
                }
            }
        }
        Ok(())
    }
}
