use crate::capture::names;
use crate::control::{ControlId, ControlType, Rect};
use crate::query::ControlQuery;
use crate::result::PulsarResult;
use crate::session::Session;

/// Loose track-name comparison.
///
/// Captures abbreviate long thread names and decorate others, so two names
/// are considered the same track when either one contains the other.
#[must_use]
pub fn names_match(expected: &str, actual: &str) -> bool {
    expected.contains(actual) || actual.contains(expected)
}

/// One track row in the time graph.
///
/// Resolved once from the row's container pane; the title and the optional
/// data panes are looked up among the container's direct children. Pane
/// absence is meaningful (a track without sampling data has no events pane),
/// so panes are held as `Option` rather than failing the lookup.
#[derive(Debug, Clone)]
pub struct Track {
    container: ControlId,
    title: ControlId,
    name: String,
    timers: Option<ControlId>,
    events: Option<ControlId>,
    thread_states: Option<ControlId>,
    tracepoints: Option<ControlId>,
}

impl Track {
    /// Wrap a track container pane
    pub fn from_container(session: &Session, container: ControlId) -> PulsarResult<Self> {
        let title = session
            .try_find_control(container, &ControlQuery::of_type(ControlType::TabItem))?
            .ok_or_else(|| crate::result::PulsarError::ControlNotFound {
                query: ControlQuery::of_type(ControlType::TabItem).to_string(),
                scope: container.to_string(),
            })?;
        let name = session.info(title)?.name;
        let pane = |pane_name: &str| -> PulsarResult<Option<ControlId>> {
            session.try_find_control(
                container,
                &ControlQuery::of_type(ControlType::Pane).named(pane_name),
            )
        };
        Ok(Self {
            container,
            title,
            name,
            timers: pane(names::TIMERS_PANE)?,
            events: pane(names::EVENTS_PANE)?,
            thread_states: pane(names::THREAD_STATES_PANE)?,
            tracepoints: pane(names::TRACEPOINTS_PANE)?,
        })
    }

    /// The row's container pane
    #[must_use]
    pub const fn container(&self) -> ControlId {
        self.container
    }

    /// The row's title tab
    #[must_use]
    pub const fn title(&self) -> ControlId {
        self.title
    }

    /// Track name as shown on the title tab
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Timers pane, if the track carries timer data
    #[must_use]
    pub const fn timers(&self) -> Option<ControlId> {
        self.timers
    }

    /// Sampling events pane, if present
    #[must_use]
    pub const fn events(&self) -> Option<ControlId> {
        self.events
    }

    /// Thread-state pane, if present
    #[must_use]
    pub const fn thread_states(&self) -> Option<ControlId> {
        self.thread_states
    }

    /// Tracepoints pane, if present
    #[must_use]
    pub const fn tracepoints(&self) -> Option<ControlId> {
        self.tracepoints
    }

    /// Current on-screen rectangle of the row
    pub fn rect(&self, session: &Session) -> PulsarResult<Rect> {
        Ok(session.info(self.container)?.rect)
    }

    /// Whether the row currently holds keyboard focus
    pub fn is_selected(&self, session: &Session) -> PulsarResult<bool> {
        Ok(session.info(self.container)?.has_keyboard_focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockUiDriver, TrackSpec, WINDOW_TITLE};

    fn session() -> Session {
        let driver = MockUiDriver::builder()
            .track(TrackSpec::new("gfx").timers(true))
            .track(TrackSpec::new("hello_ggp_stand").timers(true).events(true))
            .build();
        Session::attach(Box::new(driver), WINDOW_TITLE).unwrap()
    }

    #[test]
    fn test_track_resolves_title_and_panes() {
        let mut session = session();
        let time_graph = session
            .find_control(
                session.top_window(),
                &ControlQuery::of_type(ControlType::Image).named(names::TIME_GRAPH),
            )
            .unwrap();
        let containers = session.children(time_graph).unwrap();

        let gfx = Track::from_container(&session, containers[0]).unwrap();
        assert_eq!(gfx.name(), "gfx");
        assert!(gfx.timers().is_some());
        assert!(gfx.events().is_none());

        let hello = Track::from_container(&session, containers[1]).unwrap();
        assert!(hello.timers().is_some());
        assert!(hello.events().is_some());
        assert!(hello.thread_states().is_none());
    }
}
