//! Per-file upload outcomes and the end-of-run report.

use std::fmt::Write as _;
use std::path::PathBuf;

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A new remote file was created.
    Created,
    /// An existing same-named remote file was updated in place.
    Updated,
    /// A file with the same content digest already exists in the target
    /// folder; no upload was attempted.
    SkippedDuplicate { reason: String },
    /// The upload attempt failed; the run continued with the next file.
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: UploadOutcome,
}

/// Collected outcomes for one run. Only skips and failures are itemized in
/// the summary; successes get their per-file log lines during processing.
#[derive(Debug, Default)]
pub struct RunReport {
    reports: Vec<FileReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: PathBuf, outcome: UploadOutcome) {
        self.reports.push(FileReport { path, outcome });
    }

    pub fn reports(&self) -> &[FileReport] {
        &self.reports
    }

    pub fn skipped(&self) -> Vec<&FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, UploadOutcome::SkippedDuplicate { .. }))
            .collect()
    }

    pub fn failed(&self) -> Vec<&FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, UploadOutcome::Failed { .. }))
            .collect()
    }

    /// Human-readable end-of-run summary: the skipped tally always, the
    /// failed tally only when something failed.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        let skipped = self.skipped();
        let _ = writeln!(out, "Skipped {} files:", skipped.len());
        for report in skipped {
            if let UploadOutcome::SkippedDuplicate { reason } = &report.outcome {
                let _ = writeln!(out, "  {}: {}", report.path.display(), reason);
            }
        }

        let failed = self.failed();
        if !failed.is_empty() {
            let _ = writeln!(out, "Failed {} files:", failed.len());
            for report in failed {
                if let UploadOutcome::Failed { reason } = &report.outcome {
                    let _ = writeln!(out, "  {}: {}", report.path.display(), reason);
                }
            }
        }

        out
    }

    /// Process exit code: 1 when any file failed, 0 otherwise. Skips do not
    /// affect it.
    pub fn exit_code(&self) -> i32 {
        if self.failed().is_empty() {
            0
        } else {
            1
        }
    }
}
