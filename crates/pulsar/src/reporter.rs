//! Suite result reporting.
//!
//! A serializable view of [`SuiteResults`](crate::harness::SuiteResults) plus
//! a plain-text rendering for terminal output and JSON export for CI.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::harness::{CaseStatus, SuiteResults};
use crate::result::PulsarResult;

/// Serializable report of one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name
    pub name: String,
    /// Outcome
    pub status: CaseStatus,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Hard error message, if the case aborted
    pub error: Option<String>,
    /// Descriptions of the expectations that failed
    pub failed_expectations: Vec<String>,
}

/// Serializable report of a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub suite: String,
    /// Total number of cases
    pub total: usize,
    /// Passed cases
    pub passed: usize,
    /// Failed cases
    pub failed: usize,
    /// Skipped cases
    pub skipped: usize,
    /// Total duration in milliseconds
    pub duration_ms: u64,
    /// Per-case entries
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Build a report from suite results
    #[must_use]
    pub fn from_results(results: &SuiteResults) -> Self {
        let cases = results
            .results
            .iter()
            .map(|case| CaseReport {
                name: case.name.clone(),
                status: case.status,
                duration_ms: u64::try_from(case.duration.as_millis()).unwrap_or(u64::MAX),
                error: case.error.clone(),
                failed_expectations: case
                    .expectations
                    .iter()
                    .filter(|expectation| !expectation.passed)
                    .map(|expectation| match &expectation.detail {
                        Some(detail) => format!("{} ({detail})", expectation.description),
                        None => expectation.description.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            suite: results.suite_name.clone(),
            total: results.total(),
            passed: results.passed_count(),
            failed: results.failed_count(),
            skipped: results.skipped_count(),
            duration_ms: u64::try_from(results.duration.as_millis()).unwrap_or(u64::MAX),
            cases,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> PulsarResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to a file
    pub fn write_json(&self, path: &Path) -> PulsarResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Render a terminal summary
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "suite '{}' ({}ms)", self.suite, self.duration_ms);
        for case in &self.cases {
            let marker = match case.status {
                CaseStatus::Passed => "PASS",
                CaseStatus::Failed => "FAIL",
                CaseStatus::Skipped => "SKIP",
            };
            let _ = writeln!(out, "  [{marker}] {} ({}ms)", case.name, case.duration_ms);
            if let Some(error) = &case.error {
                let _ = writeln!(out, "         error: {error}");
            }
            for failed in &case.failed_expectations {
                let _ = writeln!(out, "         failed: {failed}");
            }
        }
        let _ = writeln!(
            out,
            "{} passed, {} failed, {} skipped of {}",
            self.passed, self.failed, self.skipped, self.total
        );
        out
    }
}
