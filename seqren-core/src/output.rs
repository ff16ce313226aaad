use crate::job::{JobReport, JobState, RenamedItem};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// Result of a rename operation
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameResult {
    pub report: JobReport,
    /// Files dropped by the extension filter before the job was built
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<PathBuf>,
}

impl RenameResult {
    pub fn succeeded(&self) -> bool {
        self.report.state == JobState::Completed
    }
}

/// Result of a dry run: what each file would be renamed to
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResult {
    pub prefix: String,
    pub items: Vec<RenamedItem>,
    pub skipped: usize,
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }

    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for RenameResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.succeeded(),
            "operation": "rename",
            "job_id": self.report.id,
            "prefix": self.report.prefix,
            "state": self.report.state,
            "summary": {
                "total": self.report.total,
                "renamed": self.report.completed(),
                "skipped": self.skipped,
            },
            "renames": self.report.renamed,
            "failure": self.report.failure,
            "error": self.error,
            "journal": self.journal,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        match self.report.state {
            JobState::Completed => {
                writeln!(
                    output,
                    "✓ Renamed {} of {} files with prefix '{}'",
                    self.report.completed(),
                    self.report.total,
                    self.report.prefix
                )
                .unwrap();
            },
            JobState::Cancelled => {
                writeln!(
                    output,
                    "Cancelled after renaming {} of {} files",
                    self.report.completed(),
                    self.report.total
                )
                .unwrap();
            },
            _ => {
                writeln!(
                    output,
                    "✗ Stopped after renaming {} of {} files",
                    self.report.completed(),
                    self.report.total
                )
                .unwrap();
                if let Some(failure) = &self.report.failure {
                    writeln!(
                        output,
                        "  Could not rename {} (item {}): {}",
                        failure.path.display(),
                        failure.index,
                        failure.cause
                    )
                    .unwrap();
                } else if let Some(error) = &self.error {
                    writeln!(output, "  {}", error).unwrap();
                }
            },
        }

        if self.skipped > 0 {
            writeln!(output, "Skipped {} files not matching the filter", self.skipped).unwrap();
        }

        if let Some(journal) = &self.journal {
            writeln!(output, "Log: {}", journal.display()).unwrap();
        }

        output
    }
}

impl OutputFormatter for PreviewResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "plan",
            "prefix": self.prefix,
            "dry_run": true,
            "summary": {
                "total": self.items.len(),
                "skipped": self.skipped,
            },
            "renames": self.items,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(
            output,
            "Seqren plan: {} files -> {}1..{}",
            self.items.len(),
            self.prefix,
            self.items.len()
        )
        .unwrap();
        if self.skipped > 0 {
            writeln!(output, "Skipped {} files not matching the filter", self.skipped).unwrap();
        }
        output
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}\n", self.name, self.version)
    }
}
