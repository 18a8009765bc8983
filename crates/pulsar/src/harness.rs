//! Suite harness with expectation recording.
//!
//! Test cases record boolean expectations instead of panicking, so a single
//! case can report every mismatch it saw. Hard errors (control lookup
//! failures, input errors) abort the case and fail it. The runner sequences
//! cases against one shared session, stopping at the first failure by
//! default.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::{Duration, Instant};

use crate::result::PulsarResult;
use crate::session::Session;

/// One recorded expectation check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectation {
    /// What was being checked
    pub description: String,
    /// Whether the check held
    pub passed: bool,
    /// Mismatch detail for failed checks
    pub detail: Option<String>,
}

/// Recorder collecting expectation checks for one test case
#[derive(Debug, Default)]
pub struct Expectations {
    entries: Vec<Expectation>,
}

impl Expectations {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a boolean expectation
    pub fn expect_true(&mut self, condition: bool, description: impl Into<String>) {
        let description = description.into();
        if !condition {
            tracing::warn!(expectation = %description, "expectation failed");
        }
        self.entries.push(Expectation {
            description,
            passed: condition,
            detail: None,
        });
    }

    /// Record an equality expectation
    pub fn expect_eq<T: PartialEq + Debug>(
        &mut self,
        actual: T,
        expected: T,
        description: impl Into<String>,
    ) {
        let description = description.into();
        let passed = actual == expected;
        let detail = if passed {
            None
        } else {
            tracing::warn!(expectation = %description, ?expected, ?actual, "expectation failed");
            Some(format!("expected {expected:?}, got {actual:?}"))
        };
        self.entries.push(Expectation {
            description,
            passed,
            detail,
        });
    }

    /// All recorded checks
    #[must_use]
    pub fn entries(&self) -> &[Expectation] {
        &self.entries
    }

    /// Whether every recorded check passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(|entry| entry.passed)
    }

    /// Failed checks only
    #[must_use]
    pub fn failures(&self) -> Vec<&Expectation> {
        self.entries.iter().filter(|entry| !entry.passed).collect()
    }

    /// Consume the recorder, returning the recorded checks
    #[must_use]
    pub fn into_entries(self) -> Vec<Expectation> {
        self.entries
    }
}

/// A parameterized test-case fragment
pub trait TestCase {
    /// Human-readable case name, including distinguishing parameters
    fn name(&self) -> String;

    /// Drive the UI and record expectations.
    ///
    /// # Errors
    ///
    /// Hard failures (lookup, input, invalid parameters) abort the case.
    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()>;
}

/// An ordered sequence of test cases sharing one session
#[derive(Default)]
pub struct Suite {
    /// Suite name
    pub name: String,
    cases: Vec<Box<dyn TestCase>>,
}

impl Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("cases", &self.cases.len())
            .finish()
    }
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Append a case (builder form)
    #[must_use]
    pub fn with_case(mut self, case: impl TestCase + 'static) -> Self {
        self.cases.push(Box::new(case));
        self
    }

    /// Append a case
    pub fn add_case(&mut self, case: impl TestCase + 'static) {
        self.cases.push(Box::new(case));
    }

    /// Number of cases in the suite
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// The cases, in execution order
    #[must_use]
    pub fn cases(&self) -> &[Box<dyn TestCase>] {
        &self.cases
    }
}

/// What to do after a case fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop the run at the first failing case (default)
    #[default]
    FailFast,
    /// Keep running and collect every failure
    CollectAll,
}

/// Outcome of a single case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Every expectation held and no error occurred
    Passed,
    /// An expectation failed or the case returned an error
    Failed,
    /// Not executed because an earlier case stopped the run
    Skipped,
}

impl CaseStatus {
    /// Whether this outcome counts as passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one executed (or skipped) case
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// Case name
    pub name: String,
    /// Outcome
    pub status: CaseStatus,
    /// Wall-clock duration of the case
    pub duration: Duration,
    /// Hard error message, when the case aborted
    pub error: Option<String>,
    /// Every expectation the case recorded
    pub expectations: Vec<Expectation>,
}

/// Results of a full suite run
#[derive(Debug, Clone)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Per-case results in execution order
    pub results: Vec<CaseResult>,
    /// Total run duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Whether every executed case passed and none were skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results
            .iter()
            .all(|result| result.status.is_passed())
    }

    /// Number of passed cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count_status(CaseStatus::Passed)
    }

    /// Number of failed cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count_status(CaseStatus::Failed)
    }

    /// Number of skipped cases
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count_status(CaseStatus::Skipped)
    }

    /// Total number of cases
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed cases only
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results
            .iter()
            .filter(|result| result.status == CaseStatus::Failed)
            .collect()
    }

    fn count_status(&self, status: CaseStatus) -> usize {
        self.results
            .iter()
            .filter(|result| result.status == status)
            .count()
    }
}

/// Sequences a suite's cases against one session
#[derive(Debug, Default)]
pub struct SuiteRunner {
    failure_mode: FailureMode,
}

impl SuiteRunner {
    /// Create a runner with the default fail-fast mode
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Run every case in order, sharing the session.
    #[must_use]
    pub fn run(&self, suite: &Suite, session: &mut Session) -> SuiteResults {
        let suite_start = Instant::now();
        tracing::info!(suite = %suite.name, cases = suite.case_count(), "running suite");

        let mut results = Vec::with_capacity(suite.case_count());
        let mut stopped = false;

        for case in suite.cases() {
            let name = case.name();
            if stopped {
                results.push(CaseResult {
                    name,
                    status: CaseStatus::Skipped,
                    duration: Duration::ZERO,
                    error: None,
                    expectations: Vec::new(),
                });
                continue;
            }

            tracing::info!(case = %name, "running test case");
            let case_start = Instant::now();
            let mut check = Expectations::new();
            let outcome = case.run(session, &mut check);
            let duration = case_start.elapsed();

            let (status, error) = match outcome {
                Ok(()) if check.all_passed() => (CaseStatus::Passed, None),
                Ok(()) => (CaseStatus::Failed, None),
                Err(error) => {
                    tracing::error!(case = %name, %error, "test case aborted");
                    (CaseStatus::Failed, Some(error.to_string()))
                }
            };

            if status == CaseStatus::Failed && self.failure_mode == FailureMode::FailFast {
                stopped = true;
            }

            results.push(CaseResult {
                name,
                status,
                duration,
                error,
                expectations: check.into_entries(),
            });
        }

        let results = SuiteResults {
            suite_name: suite.name.clone(),
            results,
            duration: suite_start.elapsed(),
        };
        tracing::info!(
            suite = %suite.name,
            passed = results.passed_count(),
            failed = results.failed_count(),
            skipped = results.skipped_count(),
            "suite finished"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockUiDriver, WINDOW_TITLE};
    use crate::result::PulsarError;

    fn empty_session() -> Session {
        Session::attach(Box::new(MockUiDriver::builder().build()), WINDOW_TITLE).unwrap()
    }

    struct AlwaysPasses;
    impl TestCase for AlwaysPasses {
        fn name(&self) -> String {
            "always_passes".to_string()
        }
        fn run(&self, _session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
            check.expect_true(true, "tautology");
            Ok(())
        }
    }

    struct FailsExpectation;
    impl TestCase for FailsExpectation {
        fn name(&self) -> String {
            "fails_expectation".to_string()
        }
        fn run(&self, _session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
            check.expect_eq(1, 2, "one equals two");
            Ok(())
        }
    }

    struct Aborts;
    impl TestCase for Aborts {
        fn name(&self) -> String {
            "aborts".to_string()
        }
        fn run(&self, _session: &mut Session, _check: &mut Expectations) -> PulsarResult<()> {
            Err(PulsarError::InputError {
                message: "synthetic".to_string(),
            })
        }
    }

    mod expectations_tests {
        use super::*;

        #[test]
        fn test_expect_true_records_both_outcomes() {
            let mut check = Expectations::new();
            check.expect_true(true, "holds");
            check.expect_true(false, "does not hold");
            assert_eq!(check.entries().len(), 2);
            assert!(!check.all_passed());
            assert_eq!(check.failures().len(), 1);
            assert_eq!(check.failures()[0].description, "does not hold");
        }

        #[test]
        fn test_expect_eq_detail_on_mismatch() {
            let mut check = Expectations::new();
            check.expect_eq(3, 5, "track index");
            let failures = check.failures();
            assert_eq!(
                failures[0].detail.as_deref(),
                Some("expected 5, got 3")
            );
        }
    }

    mod runner_tests {
        use super::*;

        #[test]
        fn test_all_passing_suite() {
            let suite = Suite::new("smoke")
                .with_case(AlwaysPasses)
                .with_case(AlwaysPasses);
            let mut session = empty_session();
            let results = SuiteRunner::new().run(&suite, &mut session);
            assert!(results.all_passed());
            assert_eq!(results.passed_count(), 2);
            assert_eq!(results.total(), 2);
        }

        #[test]
        fn test_fail_fast_skips_remaining() {
            let suite = Suite::new("fail-fast")
                .with_case(AlwaysPasses)
                .with_case(FailsExpectation)
                .with_case(AlwaysPasses);
            let mut session = empty_session();
            let results = SuiteRunner::new().run(&suite, &mut session);
            assert_eq!(results.passed_count(), 1);
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.skipped_count(), 1);
            assert!(!results.all_passed());
        }

        #[test]
        fn test_collect_all_keeps_running() {
            let suite = Suite::new("collect")
                .with_case(FailsExpectation)
                .with_case(Aborts)
                .with_case(AlwaysPasses);
            let mut session = empty_session();
            let runner = SuiteRunner::new().with_failure_mode(FailureMode::CollectAll);
            let results = runner.run(&suite, &mut session);
            assert_eq!(results.failed_count(), 2);
            assert_eq!(results.passed_count(), 1);
            assert_eq!(results.skipped_count(), 0);
        }

        #[test]
        fn test_hard_error_recorded_on_result() {
            let suite = Suite::new("abort").with_case(Aborts);
            let mut session = empty_session();
            let results = SuiteRunner::new().run(&suite, &mut session);
            let failure = &results.failures()[0];
            assert!(failure.error.as_deref().unwrap().contains("synthetic"));
        }
    }
}
