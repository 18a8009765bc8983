use std::time::Duration;

use tracing::info;

use crate::capture::names;
use crate::capture::{DataViewPanel, Track};
use crate::control::{ControlId, ControlType, Point};
use crate::input::{DragOperation, MouseButton};
use crate::query::ControlQuery;
use crate::result::{PulsarError, PulsarResult};
use crate::session::Session;

/// Page object for the profiler capture window.
///
/// Owns the stable landmarks (time graph, toolbar) and exposes the
/// interactions the scenarios are written against: selecting and moving
/// tracks, filtering, driving the capture options dialog and taking a
/// capture. Track lookups always re-read the tree because filtering and
/// capturing replace the visible rows.
#[derive(Debug)]
pub struct CaptureWindow {
    time_graph: ControlId,
    toolbar: ControlId,
}

impl CaptureWindow {
    /// Resolve the capture window landmarks, switching to the capture tab
    /// first so they are on screen.
    pub fn locate(session: &mut Session) -> PulsarResult<Self> {
        let top = session.top_window();
        let tab = session.find_control(
            top,
            &ControlQuery::of_type(ControlType::TabItem).named(names::CAPTURE_TAB_ITEM),
        )?;
        session.click(tab)?;
        let tab_group = session.find_control(
            top,
            &ControlQuery::of_type(ControlType::Group).named(names::CAPTURE_TAB_GROUP),
        )?;
        let time_graph = session.find_control(
            tab_group,
            &ControlQuery::of_type(ControlType::Image).named(names::TIME_GRAPH),
        )?;
        let toolbar = session.find_control(
            tab_group,
            &ControlQuery::of_type(ControlType::ToolBar).named(names::CAPTURE_TOOLBAR),
        )?;
        Ok(Self {
            time_graph,
            toolbar,
        })
    }

    /// The time-graph control
    #[must_use]
    pub const fn time_graph(&self) -> ControlId {
        self.time_graph
    }

    /// Visible tracks in display order
    pub fn tracks(&self, session: &Session) -> PulsarResult<Vec<Track>> {
        session
            .children(self.time_graph)?
            .into_iter()
            .map(|container| Track::from_container(session, container))
            .collect()
    }

    /// The visible track with the given title, if any
    pub fn track_by_name(&self, session: &Session, name: &str) -> PulsarResult<Option<Track>> {
        Ok(self
            .tracks(session)?
            .into_iter()
            .find(|track| track.name() == name))
    }

    /// Visible tracks whose name matches `fragment` (either name containing
    /// the other, so abbreviated capture names still match). An empty
    /// fragment matches every track.
    pub fn tracks_containing(
        &self,
        session: &Session,
        fragment: &str,
    ) -> PulsarResult<Vec<Track>> {
        Ok(self
            .tracks(session)?
            .into_iter()
            .filter(|track| {
                fragment.is_empty() || crate::capture::names_match(fragment, track.name())
            })
            .collect())
    }

    /// The currently selected track, if any
    pub fn selected_track(&self, session: &Session) -> PulsarResult<Option<Track>> {
        for track in self.tracks(session)? {
            if track.is_selected(session)? {
                return Ok(Some(track));
            }
        }
        Ok(None)
    }

    /// Click a track's title tab to select it
    pub fn select_track(&self, session: &mut Session, track: &Track) -> PulsarResult<()> {
        info!(track = track.name(), "selecting track");
        session.click(track.title())
    }

    /// Clear the track selection by clicking the empty strip just above the
    /// selected row.
    pub fn deselect_tracks(&self, session: &mut Session) -> PulsarResult<()> {
        let Some(selected) = self.selected_track(session)? else {
            return Ok(());
        };
        info!(track = selected.name(), "deselecting track");
        let rect = selected.rect(session)?;
        session.click_at(Point::new(rect.left + 10, rect.top - 5), MouseButton::Left)
    }

    /// Drag a track so it lands at `new_index` among the visible rows.
    ///
    /// The drop point is derived from the row currently occupying the target
    /// slot: just above its top when moving up, just below its bottom when
    /// moving down.
    pub fn move_track(
        &self,
        session: &mut Session,
        track: &Track,
        new_index: usize,
    ) -> PulsarResult<()> {
        let tracks = self.tracks(session)?;
        let count = tracks.len();
        if count == 0 {
            return Err(PulsarError::InvalidArguments {
                message: "no visible tracks to move".to_string(),
            });
        }
        let new_index = new_index % count;
        let current_index = tracks
            .iter()
            .position(|candidate| candidate.container() == track.container())
            .ok_or_else(|| PulsarError::InvalidArguments {
                message: format!("track {:?} is not visible", track.name()),
            })?;
        if current_index == new_index {
            return Ok(());
        }
        info!(
            track = track.name(),
            from = current_index,
            to = new_index,
            "moving track"
        );
        let target_rect = tracks[new_index].rect(session)?;
        let from = session.info(track.title())?.rect.center();
        let drop_y = if current_index > new_index {
            target_rect.top - 1
        } else {
            target_rect.bottom + 1
        };
        session.drag(from, DragOperation::to(Point::new(from.x, drop_y)))
    }

    /// Index of a track among the visible rows
    pub fn track_index(&self, session: &Session, track: &Track) -> PulsarResult<Option<usize>> {
        Ok(self
            .tracks(session)?
            .iter()
            .position(|candidate| candidate.container() == track.container()))
    }

    fn filter_edit(&self, session: &mut Session) -> PulsarResult<ControlId> {
        session.find_control(
            self.toolbar,
            &ControlQuery::of_type(ControlType::Edit).named(names::FILTER_TRACKS_EDIT),
        )
    }

    /// Type into the track filter, replacing its current contents
    pub fn filter_tracks(&self, session: &mut Session, text: &str) -> PulsarResult<()> {
        info!(filter = text, "filtering tracks");
        let edit = self.filter_edit(session)?;
        session.set_edit_text(edit, "")?;
        session.set_focus(edit)?;
        session.send_keys(text)
    }

    /// Clear the track filter
    pub fn clear_track_filter(&self, session: &mut Session) -> PulsarResult<()> {
        let edit = self.filter_edit(session)?;
        session.set_edit_text(edit, "")
    }

    /// Open the capture options dialog
    pub fn open_capture_options(&self, session: &mut Session) -> PulsarResult<ControlId> {
        let button = session.find_control(
            self.toolbar,
            &ControlQuery::of_type(ControlType::Button).named(names::CAPTURE_OPTIONS_BUTTON),
        )?;
        session.click(button)?;
        session.find_control(
            session.top_window(),
            &ControlQuery::of_type(ControlType::Window).named(names::CAPTURE_OPTIONS_DIALOG),
        )
    }

    /// Set the thread-state collection option through the options dialog
    pub fn set_collect_thread_states(
        &self,
        session: &mut Session,
        enabled: bool,
    ) -> PulsarResult<()> {
        info!(enabled, "setting thread-state collection");
        let dialog = self.open_capture_options(session)?;
        let checkbox = session.find_control(
            dialog,
            &ControlQuery::of_type(ControlType::CheckBox)
                .named(names::COLLECT_THREAD_STATES_CHECKBOX),
        )?;
        let state = session.info(checkbox)?.toggle_state.unwrap_or(false);
        if state != enabled {
            session.click(checkbox)?;
        }
        let ok = session.find_control(
            dialog,
            &ControlQuery::of_type(ControlType::Button).named(names::OK_BUTTON),
        )?;
        session.click(ok)
    }

    fn toggle_capture_button(&self, session: &mut Session) -> PulsarResult<ControlId> {
        session.find_control(
            self.toolbar,
            &ControlQuery::of_type(ControlType::Button).named(names::TOGGLE_CAPTURE_BUTTON),
        )
    }

    /// Start a capture, let it run for `duration`, then stop it
    pub fn take_capture(&self, session: &mut Session, duration: Duration) -> PulsarResult<()> {
        info!(seconds = duration.as_secs(), "taking capture");
        let toggle = self.toggle_capture_button(session)?;
        session.click(toggle)?;
        session.sleep(duration);
        let toggle = self.toggle_capture_button(session)?;
        session.click(toggle)
    }

    /// Locate a data-view panel by its accessible name
    pub fn data_view_panel(
        &self,
        session: &mut Session,
        panel_name: &str,
    ) -> PulsarResult<DataViewPanel> {
        let panel = session.find_control(
            session.top_window(),
            &ControlQuery::of_type(ControlType::Pane).named(panel_name),
        )?;
        DataViewPanel::locate(session, panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockUiDriver, TrackSpec, WINDOW_TITLE};

    fn session() -> Session {
        let driver = MockUiDriver::builder()
            .track(TrackSpec::new("Scheduler").selectable(false))
            .track(TrackSpec::new("gfx").timers(true))
            .track(TrackSpec::new("All Threads").events(true))
            .track(TrackSpec::new("hello_ggp_stand").timers(true).events(true))
            .build();
        Session::attach(Box::new(driver), WINDOW_TITLE).unwrap()
    }

    #[test]
    fn test_locate_switches_to_capture_tab() {
        let mut session = session();
        let window = CaptureWindow::locate(&mut session).unwrap();
        assert_eq!(window.tracks(&session).unwrap().len(), 4);
    }

    #[test]
    fn test_select_and_deselect() {
        let mut session = session();
        let window = CaptureWindow::locate(&mut session).unwrap();
        let track = window.track_by_name(&session, "gfx").unwrap().unwrap();

        window.select_track(&mut session, &track).unwrap();
        assert!(track.is_selected(&session).unwrap());
        assert_eq!(
            window.selected_track(&session).unwrap().unwrap().name(),
            "gfx"
        );

        window.deselect_tracks(&mut session).unwrap();
        assert!(window.selected_track(&session).unwrap().is_none());
    }

    #[test]
    fn test_move_track_up_and_down() {
        let mut session = session();
        let window = CaptureWindow::locate(&mut session).unwrap();

        let track = window
            .track_by_name(&session, "hello_ggp_stand")
            .unwrap()
            .unwrap();
        window.move_track(&mut session, &track, 0).unwrap();
        assert_eq!(window.track_index(&session, &track).unwrap(), Some(0));

        window.move_track(&mut session, &track, 3).unwrap();
        assert_eq!(window.track_index(&session, &track).unwrap(), Some(3));
    }

    #[test]
    fn test_move_track_wraps_index() {
        let mut session = session();
        let window = CaptureWindow::locate(&mut session).unwrap();
        let track = window.track_by_name(&session, "gfx").unwrap().unwrap();
        // 6 % 4 == 2
        window.move_track(&mut session, &track, 6).unwrap();
        assert_eq!(window.track_index(&session, &track).unwrap(), Some(2));
    }

    #[test]
    fn test_filter_and_clear() {
        let mut session = session();
        let window = CaptureWindow::locate(&mut session).unwrap();

        window.filter_tracks(&mut session, "ggp").unwrap();
        let names: Vec<String> = window
            .tracks(&session)
            .unwrap()
            .iter()
            .map(|track| track.name().to_string())
            .collect();
        assert_eq!(names, vec!["hello_ggp_stand"]);

        window.clear_track_filter(&mut session).unwrap();
        assert_eq!(window.tracks(&session).unwrap().len(), 4);
    }

    #[test]
    fn test_capture_with_thread_states() {
        let driver = MockUiDriver::builder()
            .capture_profile(vec![
                TrackSpec::new("Scheduler").selectable(false),
                TrackSpec::new("All Threads").events(true).thread_states(true),
            ])
            .build();
        let mut session = Session::attach(Box::new(driver), WINDOW_TITLE).unwrap();
        let window = CaptureWindow::locate(&mut session).unwrap();

        window.set_collect_thread_states(&mut session, true).unwrap();
        window
            .take_capture(&mut session, Duration::from_secs(5))
            .unwrap();

        let track = window
            .track_by_name(&session, "All Threads")
            .unwrap()
            .unwrap();
        assert!(track.thread_states().is_some());
    }
}
