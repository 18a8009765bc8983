//! Pulsar: UI Automation Testing for the Profiler Capture Window
//!
//! Pulsar drives the profiler's capture window the way a user would and
//! records expectations about what the window shows: which tracks are
//! visible, which one is selected, what order they are in, and what data
//! panes a capture produced.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    PULSAR Architecture                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌─────────────┐       │
//! │   │ Scenarios  │    │ Capture     │    │ UiDriver    │       │
//! │   │ (TestCase) │───►│ Page        │───►│ (mock or    │       │
//! │   │            │    │ Objects     │    │  real UI)   │       │
//! │   └────────────┘    └─────────────┘    └─────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scenarios never talk to controls directly: they go through the page
//! objects in [`capture`], which resolve controls by type and accessible
//! name with auto-waiting. The [`control::UiDriver`] seam at the bottom
//! lets the same scenarios run against the deterministic [`mock`] driver
//! or a real accessibility backend.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Page objects for the capture window (time graph, tracks, data views)
pub mod capture;
mod control;
/// Test cases, suites and expectation recording
pub mod harness;
mod input;
/// Deterministic in-memory capture window for driver-independent tests
pub mod mock;
mod query;
mod reporter;
mod result;
/// Ready-made capture-window test cases
pub mod scenarios;
mod session;
mod wait;

pub use capture::{CaptureWindow, DataViewPanel, Track};
pub use control::{
    ControlId, ControlInfo, ControlType, GridDims, Point, Rect, UiDriver,
};
pub use harness::{
    CaseResult, CaseStatus, Expectation, Expectations, FailureMode, Suite, SuiteResults,
    SuiteRunner, TestCase,
};
pub use input::{DragOperation, MouseButton};
pub use query::{ControlQuery, FindOptions};
pub use reporter::{CaseReport, SuiteReport};
pub use result::{PulsarError, PulsarResult};
pub use session::Session;
pub use wait::{wait_until, WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
