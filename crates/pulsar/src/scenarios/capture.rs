use std::time::Duration;

use tracing::info;

use crate::capture::{CaptureWindow, Track};
use crate::harness::{Expectations, TestCase};
use crate::result::PulsarResult;
use crate::session::Session;

const DEFAULT_CAPTURE_SECONDS: u64 = 5;

/// Take a capture and verify the window shows tracks afterwards.
///
/// Thread-state collection is set through the capture options dialog before
/// the capture starts; the dialog snapshot at start time is what governs the
/// capture, so toggling the option later has no effect on it.
#[derive(Debug, Clone, Copy)]
pub struct Capture {
    length: Duration,
    collect_thread_states: bool,
}

impl Default for Capture {
    fn default() -> Self {
        Self::new()
    }
}

impl Capture {
    /// A five second capture without thread states
    #[must_use]
    pub const fn new() -> Self {
        Self {
            length: Duration::from_secs(DEFAULT_CAPTURE_SECONDS),
            collect_thread_states: false,
        }
    }

    /// Capture length
    #[must_use]
    pub const fn length(mut self, length: Duration) -> Self {
        self.length = length;
        self
    }

    /// Enable thread-state collection for this capture
    #[must_use]
    pub const fn collect_thread_states(mut self, enabled: bool) -> Self {
        self.collect_thread_states = enabled;
        self
    }
}

impl TestCase for Capture {
    fn name(&self) -> String {
        format!(
            "capture({}s, thread_states={})",
            self.length.as_secs(),
            self.collect_thread_states
        )
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        let window = CaptureWindow::locate(session)?;
        window.set_collect_thread_states(session, self.collect_thread_states)?;
        window.take_capture(session, self.length)?;
        let tracks = window.tracks(session)?;
        info!(tracks = tracks.len(), "capture finished");
        check.expect_true(!tracks.is_empty(), "capture produced at least one track");
        Ok(())
    }
}

fn check_pane(
    session: &mut Session,
    check: &mut Expectations,
    name_fragment: &str,
    pane: &str,
    expect_exists: bool,
    present: impl Fn(&Track) -> bool,
) -> PulsarResult<()> {
    let window = CaptureWindow::locate(session)?;
    let tracks = window.tracks_containing(session, name_fragment)?;
    check.expect_true(
        !tracks.is_empty(),
        format!("at least one track matches \"{name_fragment}\""),
    );
    for track in &tracks {
        if expect_exists {
            check.expect_true(
                present(track),
                format!("track \"{}\" has a {pane} pane", track.name()),
            );
        } else {
            check.expect_true(
                !present(track),
                format!("track \"{}\" has no {pane} pane", track.name()),
            );
        }
    }
    Ok(())
}

/// Verify that tracks matching a name fragment carry a timers pane
#[derive(Debug, Clone)]
pub struct CheckTimers {
    name_fragment: String,
    expect_exists: bool,
}

impl CheckTimers {
    /// Check tracks whose name matches `name_fragment`
    #[must_use]
    pub fn new(name_fragment: impl Into<String>) -> Self {
        Self {
            name_fragment: name_fragment.into(),
            expect_exists: true,
        }
    }

    /// Expect matching tracks to have no timers pane
    #[must_use]
    pub fn expecting_absent(mut self) -> Self {
        self.expect_exists = false;
        self
    }
}

impl TestCase for CheckTimers {
    fn name(&self) -> String {
        format!("check_timers({:?})", self.name_fragment)
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        check_pane(
            session,
            check,
            &self.name_fragment,
            "timers",
            self.expect_exists,
            |track| track.timers().is_some(),
        )
    }
}

/// Verify that tracks matching a name fragment carry a sampling events pane
#[derive(Debug, Clone)]
pub struct CheckEvents {
    name_fragment: String,
    expect_exists: bool,
}

impl CheckEvents {
    /// Check tracks whose name matches `name_fragment`
    #[must_use]
    pub fn new(name_fragment: impl Into<String>) -> Self {
        Self {
            name_fragment: name_fragment.into(),
            expect_exists: true,
        }
    }

    /// Expect matching tracks to have no events pane
    #[must_use]
    pub fn expecting_absent(mut self) -> Self {
        self.expect_exists = false;
        self
    }
}

impl TestCase for CheckEvents {
    fn name(&self) -> String {
        format!("check_events({:?})", self.name_fragment)
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        check_pane(
            session,
            check,
            &self.name_fragment,
            "events",
            self.expect_exists,
            |track| track.events().is_some(),
        )
    }
}

/// Verify that tracks matching a name fragment carry a thread-state pane.
/// Only meaningful after a capture taken with thread-state collection on.
#[derive(Debug, Clone)]
pub struct CheckThreadStates {
    name_fragment: String,
    expect_exists: bool,
}

impl CheckThreadStates {
    /// Check tracks whose name matches `name_fragment`
    #[must_use]
    pub fn new(name_fragment: impl Into<String>) -> Self {
        Self {
            name_fragment: name_fragment.into(),
            expect_exists: true,
        }
    }

    /// Expect matching tracks to have no thread-state pane
    #[must_use]
    pub fn expecting_absent(mut self) -> Self {
        self.expect_exists = false;
        self
    }
}

impl TestCase for CheckThreadStates {
    fn name(&self) -> String {
        format!("check_thread_states({:?})", self.name_fragment)
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        check_pane(
            session,
            check,
            &self.name_fragment,
            "thread-state",
            self.expect_exists,
            |track| track.thread_states().is_some(),
        )
    }
}
