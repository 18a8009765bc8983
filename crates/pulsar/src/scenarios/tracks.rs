use tracing::info;

use crate::capture::{names_match, CaptureWindow};
use crate::harness::{Expectations, TestCase};
use crate::result::{PulsarError, PulsarResult};
use crate::session::Session;

/// Select the track at `track_index` by clicking its title tab.
///
/// With `expect_failure` the click is still made but the track is expected
/// to stay unselected, which is the behavior of non-selectable tracks like
/// the scheduler.
#[derive(Debug, Clone, Copy)]
pub struct SelectTrack {
    track_index: usize,
    check_selection_before: bool,
    expect_failure: bool,
}

impl SelectTrack {
    /// Select the track at `track_index`
    #[must_use]
    pub const fn new(track_index: usize) -> Self {
        Self {
            track_index,
            check_selection_before: true,
            expect_failure: false,
        }
    }

    /// Skip the check that the track starts out unselected
    #[must_use]
    pub const fn without_prior_check(mut self) -> Self {
        self.check_selection_before = false;
        self
    }

    /// Expect the selection attempt to have no effect
    #[must_use]
    pub const fn expecting_failure(mut self) -> Self {
        self.expect_failure = true;
        self
    }
}

impl TestCase for SelectTrack {
    fn name(&self) -> String {
        format!("select_track({})", self.track_index)
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        let window = CaptureWindow::locate(session)?;
        let tracks = window.tracks(session)?;
        let track = tracks
            .get(self.track_index)
            .ok_or_else(|| PulsarError::InvalidArguments {
                message: format!(
                    "track index {} out of range ({} tracks)",
                    self.track_index,
                    tracks.len()
                ),
            })?;
        if self.check_selection_before {
            check.expect_true(
                !track.is_selected(session)?,
                format!("track \"{}\" is not selected before the click", track.name()),
            );
        }
        window.select_track(session, track)?;
        let selected = track.is_selected(session)?;
        if self.expect_failure {
            check.expect_true(
                !selected,
                format!("track \"{}\" stayed unselected", track.name()),
            );
        } else {
            check.expect_true(
                selected,
                format!("track \"{}\" is selected after the click", track.name()),
            );
        }
        Ok(())
    }
}

/// Clear the current track selection by clicking the empty strip above the
/// selected row.
///
/// A track must be selected when the case runs; afterwards no track at all
/// may hold the focus.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeselectTrack;

impl DeselectTrack {
    /// Deselect whichever track is currently selected
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TestCase for DeselectTrack {
    fn name(&self) -> String {
        "deselect_track".to_string()
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        let window = CaptureWindow::locate(session)?;
        let Some(selected) = window.selected_track(session)? else {
            return Err(PulsarError::AssertionError {
                message: "no track is selected before deselecting".to_string(),
            });
        };
        window.deselect_tracks(session)?;
        check.expect_true(
            !selected.is_selected(session)?,
            format!("track \"{}\" is deselected", selected.name()),
        );
        check.expect_true(
            window.selected_track(session)?.is_none(),
            "no track is selected afterwards",
        );
        Ok(())
    }
}

/// Drag the track at `track_index` so it lands at `new_index`.
///
/// Both indices wrap modulo the number of visible tracks, so a suite can
/// address "the last track" without knowing the count.
#[derive(Debug, Clone, Copy)]
pub struct MoveTrack {
    track_index: usize,
    new_index: usize,
    expected_new_index: Option<usize>,
}

impl MoveTrack {
    /// Move the track at `track_index` to `new_index`
    #[must_use]
    pub const fn new(track_index: usize, new_index: usize) -> Self {
        Self {
            track_index,
            new_index,
            expected_new_index: None,
        }
    }

    /// Expect the track to land at `expected_new_index` instead of
    /// `new_index`. Dropping on a pinned row, for example, legitimately
    /// settles one slot away from the drop point.
    #[must_use]
    pub const fn expecting_new_index(mut self, expected_new_index: usize) -> Self {
        self.expected_new_index = Some(expected_new_index);
        self
    }
}

impl TestCase for MoveTrack {
    fn name(&self) -> String {
        format!("move_track({} -> {})", self.track_index, self.new_index)
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        let window = CaptureWindow::locate(session)?;
        let tracks = window.tracks(session)?;
        if tracks.is_empty() {
            return Err(PulsarError::InvalidArguments {
                message: "no visible tracks to move".to_string(),
            });
        }
        let track_index = self.track_index % tracks.len();
        let new_index = self.new_index % tracks.len();
        let expected = self.expected_new_index.unwrap_or(self.new_index) % tracks.len();
        let track = &tracks[track_index];
        window.move_track(session, track, new_index)?;
        check.expect_eq(
            window.track_index(session, track)?,
            Some(expected),
            format!("track \"{}\" ended up at index {expected}", track.name()),
        );
        Ok(())
    }
}

/// A track-name pattern: one name, or any of several alternatives.
///
/// Individual names are compared with [`names_match`], so a pattern also
/// covers tracks whose display name embeds it (thread ids, pid suffixes).
#[derive(Debug, Clone)]
pub enum NameMatcher {
    /// Match a single name
    Name(String),
    /// Match any one of the listed names
    AnyOf(Vec<String>),
}

impl NameMatcher {
    /// A matcher accepting any of the given alternatives
    #[must_use]
    pub fn any_of(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::AnyOf(names.into_iter().map(Into::into).collect())
    }

    /// Whether `actual` satisfies this pattern
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Name(name) => names_match(name, actual),
            Self::AnyOf(names) => names.iter().any(|name| names_match(name, actual)),
        }
    }
}

impl From<&str> for NameMatcher {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NameMatcher {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Verify the visible tracks against an expected list of name patterns, or
/// against a bare count.
///
/// Without `allow_additional_tracks` the visible count must equal the
/// expected count and every visible track must satisfy one of the expected
/// patterns. With it, the window may show tracks beyond the expected ones,
/// but never fewer than the expected count.
#[derive(Debug, Clone)]
pub struct MatchTracks {
    expected_names: Vec<NameMatcher>,
    expected_count: Option<usize>,
    allow_additional_tracks: bool,
}

impl MatchTracks {
    /// Expect tracks matching the given patterns to be visible
    #[must_use]
    pub fn new(expected_names: impl IntoIterator<Item = impl Into<NameMatcher>>) -> Self {
        Self {
            expected_names: expected_names.into_iter().map(Into::into).collect(),
            expected_count: None,
            allow_additional_tracks: false,
        }
    }

    /// Expect `expected_count` visible tracks, regardless of their names
    #[must_use]
    pub const fn counting(expected_count: usize) -> Self {
        Self {
            expected_names: Vec::new(),
            expected_count: Some(expected_count),
            allow_additional_tracks: false,
        }
    }

    /// Tolerate visible tracks not named in the expected list
    #[must_use]
    pub const fn allowing_additional_tracks(mut self) -> Self {
        self.allow_additional_tracks = true;
        self
    }
}

impl TestCase for MatchTracks {
    fn name(&self) -> String {
        match self.expected_count {
            Some(count) if self.expected_names.is_empty() => {
                format!("match_tracks(count = {count})")
            }
            _ => format!("match_tracks({:?})", self.expected_names),
        }
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        let window = CaptureWindow::locate(session)?;
        let tracks = window.tracks(session)?;
        let expected_count = self.expected_count.unwrap_or(self.expected_names.len());
        info!(visible = tracks.len(), expected = expected_count, "matching tracks");
        if self.allow_additional_tracks {
            check.expect_true(
                tracks.len() >= expected_count,
                format!("at least {expected_count} tracks are visible"),
            );
        } else {
            check.expect_eq(
                tracks.len(),
                expected_count,
                "number of visible tracks matches the expected count",
            );
        }
        for expected in &self.expected_names {
            let found = tracks.iter().any(|track| expected.matches(track.name()));
            check.expect_true(found, format!("a track matching {expected:?} is visible"));
        }
        if !self.allow_additional_tracks && !self.expected_names.is_empty() {
            for track in &tracks {
                let listed = self
                    .expected_names
                    .iter()
                    .any(|expected| expected.matches(track.name()));
                check.expect_true(
                    listed,
                    format!("track \"{}\" is in the expected list", track.name()),
                );
            }
        }
        Ok(())
    }
}

/// Type into the track filter and verify the remaining tracks.
/// The filter is cleared again afterwards.
#[derive(Debug, Clone)]
pub struct FilterTracks {
    filter: String,
    expected_count: usize,
    expected_names: Vec<String>,
}

impl FilterTracks {
    /// Filter with `filter`, expecting `expected_count` visible tracks
    #[must_use]
    pub fn new(filter: impl Into<String>, expected_count: usize) -> Self {
        Self {
            filter: filter.into(),
            expected_count,
            expected_names: Vec::new(),
        }
    }

    /// Additionally expect tracks with these names (per [`names_match`]) to
    /// survive the filter
    #[must_use]
    pub fn expecting_names(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.expected_names = names.into_iter().map(Into::into).collect();
        self
    }
}

impl TestCase for FilterTracks {
    fn name(&self) -> String {
        format!("filter_tracks({:?})", self.filter)
    }

    fn run(&self, session: &mut Session, check: &mut Expectations) -> PulsarResult<()> {
        let window = CaptureWindow::locate(session)?;
        window.filter_tracks(session, &self.filter)?;
        let tracks = window.tracks(session)?;
        check.expect_eq(
            tracks.len(),
            self.expected_count,
            format!("filter {:?} leaves {} tracks", self.filter, self.expected_count),
        );
        for expected in &self.expected_names {
            let found = tracks
                .iter()
                .any(|track| names_match(expected, track.name()));
            check.expect_true(
                found,
                format!("a track matching \"{expected}\" survives the filter"),
            );
        }
        window.clear_track_filter(session)?;
        Ok(())
    }
}
