//! Deterministic in-memory capture window.
//!
//! A [`MockUiDriver`] models the accessibility tree of the profiler capture
//! window and reacts to synthesized input the way the live application does:
//! clicking a track row focuses it (unless the row is not selectable, like
//! the scheduler track), clicking the empty gap between rows clears the
//! selection, dragging a row reorders the track list by drop position, the
//! toolbar filter hides non-matching tracks case-insensitively, and the
//! capture toggle repopulates the track list from a configured capture
//! profile. Time is virtual: [`UiDriver::sleep`] advances a clock instead of
//! blocking, so timed captures run instantly in tests.

use std::collections::HashMap;
use std::time::Duration;

use crate::capture::names;
use crate::control::{ControlId, ControlInfo, ControlType, GridDims, Point, Rect, UiDriver};
use crate::input::MouseButton;
use crate::result::{PulsarError, PulsarResult};

/// Accessible title of the mock application window
pub const WINDOW_TITLE: &str = "Profiler";

const WINDOW_RECT: Rect = Rect::new(0, 0, 1280, 800);
const TIME_GRAPH_RECT: Rect = Rect::new(0, 64, 1000, 800);
/// First track row starts below a header strip inside the time graph
const TRACKS_TOP: i32 = 100;
const ROW_HEIGHT: i32 = 50;
/// Vertical gap between rows; clicks here hit empty space
const ROW_GAP: i32 = 6;
const ROW_CONTENT: i32 = ROW_HEIGHT - ROW_GAP;
const TRACK_WIDTH: i32 = 1000;
const TITLE_WIDTH: i32 = 120;
const TITLE_HEIGHT: i32 = 16;
const DIALOG_RECT: Rect = Rect::new(400, 200, 880, 520);

/// Configuration of one mock track row
#[derive(Debug, Clone)]
pub struct TrackSpec {
    name: String,
    selectable: bool,
    timers: bool,
    events: bool,
    tracepoints: bool,
    thread_states: bool,
}

impl TrackSpec {
    /// Create a selectable track with no panes
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selectable: true,
            timers: false,
            events: false,
            tracepoints: false,
            thread_states: false,
        }
    }

    /// Whether clicking the row gives it keyboard focus
    #[must_use]
    pub const fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Add a timers pane
    #[must_use]
    pub const fn timers(mut self, timers: bool) -> Self {
        self.timers = timers;
        self
    }

    /// Add an events pane
    #[must_use]
    pub const fn events(mut self, events: bool) -> Self {
        self.events = events;
        self
    }

    /// Add a tracepoints pane
    #[must_use]
    pub const fn tracepoints(mut self, tracepoints: bool) -> Self {
        self.tracepoints = tracepoints;
        self
    }

    /// Add a thread-state pane when collection is enabled at capture time
    #[must_use]
    pub const fn thread_states(mut self, thread_states: bool) -> Self {
        self.thread_states = thread_states;
        self
    }
}

/// Configuration of the optional data-view panel
#[derive(Debug, Clone)]
pub struct DataViewSpec {
    panel_name: String,
    rows: Vec<Vec<String>>,
    cols: usize,
    with_refresh: bool,
}

impl DataViewSpec {
    /// Create a panel with the given cell contents
    #[must_use]
    pub fn new(panel_name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            panel_name: panel_name.into(),
            rows,
            cols,
            with_refresh: true,
        }
    }

    /// Drop the refresh button (some panels do not have one)
    #[must_use]
    pub const fn without_refresh(mut self) -> Self {
        self.with_refresh = false;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    control_type: ControlType,
    name: String,
    texts: Vec<String>,
    rect: Rect,
    toggle_state: Option<bool>,
    grid: Option<GridDims>,
}

impl Node {
    fn new(control_type: ControlType, name: &str, rect: Rect) -> Self {
        Self {
            control_type,
            name: name.to_string(),
            texts: vec![name.to_string()],
            rect,
            toggle_state: None,
            grid: None,
        }
    }
}

#[derive(Debug, Clone)]
struct MockTrack {
    spec: TrackSpec,
    container: u64,
    title: u64,
    panes: Vec<u64>,
}

/// Builder for [`MockUiDriver`]
#[derive(Debug, Default)]
pub struct MockUiBuilder {
    tracks: Vec<TrackSpec>,
    capture_profile: Vec<TrackSpec>,
    data_view: Option<DataViewSpec>,
}

impl MockUiBuilder {
    /// Add a track that is present before any capture is taken
    #[must_use]
    pub fn track(mut self, spec: TrackSpec) -> Self {
        self.tracks.push(spec);
        self
    }

    /// Tracks produced by stopping a capture
    #[must_use]
    pub fn capture_profile(mut self, specs: Vec<TrackSpec>) -> Self {
        self.capture_profile = specs;
        self
    }

    /// Attach a data-view panel to the window
    #[must_use]
    pub fn data_view(mut self, spec: DataViewSpec) -> Self {
        self.data_view = Some(spec);
        self
    }

    /// Build the driver
    #[must_use]
    pub fn build(self) -> MockUiDriver {
        let mut driver = MockUiDriver::empty(self.capture_profile);
        for spec in self.tracks {
            driver.push_track(spec, false);
        }
        if let Some(spec) = self.data_view {
            driver.install_data_view(&spec);
        }
        driver.relayout();
        driver
    }
}

/// Deterministic in-memory UI driver (see module docs)
#[derive(Debug)]
pub struct MockUiDriver {
    nodes: HashMap<u64, Node>,
    next_id: u64,
    clock: Duration,

    root: u64,
    window: u64,
    tab_item: u64,
    tab_group: u64,
    toolbar: u64,
    options_button: u64,
    toggle_button: u64,
    filter_edit: u64,
    time_graph: u64,
    dialog: u64,
    checkbox: u64,
    ok_button: u64,
    data_view: Option<DataViewIds>,

    tracks: Vec<MockTrack>,
    capture_profile: Vec<TrackSpec>,
    focused_track: Option<u64>,
    focused_edit: Option<u64>,
    dialog_open: bool,
    capturing: bool,
    /// Thread-state collection setting snapshotted when a capture starts
    collect_thread_states_at_start: bool,
    capture_count: u32,
    current_tab: Option<String>,
}

#[derive(Debug, Clone)]
struct DataViewIds {
    panel: u64,
    table: u64,
    filter: u64,
    refresh: Option<u64>,
    dims: GridDims,
    cells: HashMap<(usize, usize), u64>,
}

impl MockUiDriver {
    /// Start building a mock capture window
    #[must_use]
    pub fn builder() -> MockUiBuilder {
        MockUiBuilder::default()
    }

    fn empty(capture_profile: Vec<TrackSpec>) -> Self {
        let mut nodes = HashMap::new();
        let mut next_id = 0;
        let mut alloc = |node: Node, nodes: &mut HashMap<u64, Node>| {
            let id = next_id;
            next_id += 1;
            nodes.insert(id, node);
            id
        };

        let root = alloc(
            Node::new(ControlType::Custom, "Desktop", WINDOW_RECT),
            &mut nodes,
        );
        let window = alloc(
            Node::new(ControlType::Window, WINDOW_TITLE, WINDOW_RECT),
            &mut nodes,
        );
        let tab_item = alloc(
            Node::new(
                ControlType::TabItem,
                names::CAPTURE_TAB_ITEM,
                Rect::new(0, 0, 120, 28),
            ),
            &mut nodes,
        );
        let tab_group = alloc(
            Node::new(
                ControlType::Group,
                names::CAPTURE_TAB_GROUP,
                Rect::new(0, 28, 1280, 800),
            ),
            &mut nodes,
        );
        let toolbar = alloc(
            Node::new(
                ControlType::ToolBar,
                names::CAPTURE_TOOLBAR,
                Rect::new(0, 28, 1280, 64),
            ),
            &mut nodes,
        );
        let options_button = alloc(
            Node::new(
                ControlType::Button,
                names::CAPTURE_OPTIONS_BUTTON,
                Rect::new(8, 32, 140, 60),
            ),
            &mut nodes,
        );
        let toggle_button = alloc(
            Node::new(
                ControlType::Button,
                names::TOGGLE_CAPTURE_BUTTON,
                Rect::new(148, 32, 280, 60),
            ),
            &mut nodes,
        );
        let mut filter_node = Node::new(
            ControlType::Edit,
            names::FILTER_TRACKS_EDIT,
            Rect::new(288, 32, 488, 60),
        );
        filter_node.texts = vec![String::new()];
        let filter_edit = alloc(filter_node, &mut nodes);
        let time_graph = alloc(
            Node::new(ControlType::Image, names::TIME_GRAPH, TIME_GRAPH_RECT),
            &mut nodes,
        );
        let dialog = alloc(
            Node::new(ControlType::Window, names::CAPTURE_OPTIONS_DIALOG, DIALOG_RECT),
            &mut nodes,
        );
        let mut checkbox_node = Node::new(
            ControlType::CheckBox,
            names::COLLECT_THREAD_STATES_CHECKBOX,
            Rect::new(420, 240, 640, 262),
        );
        checkbox_node.toggle_state = Some(false);
        let checkbox = alloc(checkbox_node, &mut nodes);
        let ok_button = alloc(
            Node::new(ControlType::Button, names::OK_BUTTON, Rect::new(420, 480, 500, 510)),
            &mut nodes,
        );

        Self {
            nodes,
            next_id,
            clock: Duration::ZERO,
            root,
            window,
            tab_item,
            tab_group,
            toolbar,
            options_button,
            toggle_button,
            filter_edit,
            time_graph,
            dialog,
            checkbox,
            ok_button,
            data_view: None,
            tracks: Vec::new(),
            capture_profile,
            focused_track: None,
            focused_edit: None,
            dialog_open: false,
            capturing: false,
            collect_thread_states_at_start: false,
            capture_count: 0,
            current_tab: None,
        }
    }

    fn alloc(&mut self, node: Node) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn push_track(&mut self, spec: TrackSpec, collect_thread_states: bool) {
        let placeholder = Rect::new(0, 0, 0, 0);
        let container = self.alloc(Node::new(ControlType::Pane, &spec.name, placeholder));
        let title = self.alloc(Node::new(ControlType::TabItem, &spec.name, placeholder));
        let mut panes = Vec::new();
        let mut pane = |driver: &mut Self, name: &str| {
            driver.alloc(Node::new(ControlType::Pane, name, placeholder))
        };
        if spec.timers {
            panes.push(pane(self, names::TIMERS_PANE));
        }
        if spec.events {
            panes.push(pane(self, names::EVENTS_PANE));
        }
        if spec.tracepoints {
            panes.push(pane(self, names::TRACEPOINTS_PANE));
        }
        if spec.thread_states && collect_thread_states {
            panes.push(pane(self, names::THREAD_STATES_PANE));
        }
        self.tracks.push(MockTrack {
            spec,
            container,
            title,
            panes,
        });
    }

    fn install_data_view(&mut self, spec: &DataViewSpec) {
        let panel = self.alloc(Node::new(
            ControlType::Pane,
            &spec.panel_name,
            Rect::new(1000, 64, 1280, 800),
        ));
        let dims = GridDims {
            rows: spec.rows.len(),
            cols: spec.cols,
        };
        let mut table_node = Node::new(
            ControlType::Tree,
            names::DATA_VIEW_TABLE,
            Rect::new(1000, 100, 1280, 760),
        );
        table_node.grid = Some(dims);
        let table = self.alloc(table_node);
        let mut cells = HashMap::new();
        for (row, cols) in spec.rows.iter().enumerate() {
            for (col, text) in cols.iter().enumerate() {
                let cell = self.alloc(Node::new(
                    ControlType::Custom,
                    text,
                    Rect::new(0, 0, 0, 0),
                ));
                cells.insert((row, col), cell);
            }
        }
        let mut filter_node = Node::new(
            ControlType::Edit,
            names::DATA_VIEW_FILTER_EDIT,
            Rect::new(1070, 64, 1270, 90),
        );
        filter_node.texts = vec![String::new()];
        let filter = self.alloc(filter_node);
        let refresh = spec.with_refresh.then(|| {
            self.alloc(Node::new(
                ControlType::Button,
                names::REFRESH_BUTTON,
                Rect::new(1000, 64, 1060, 90),
            ))
        });
        self.data_view = Some(DataViewIds {
            panel,
            table,
            filter,
            refresh,
            dims,
            cells,
        });
    }

    fn data_view_children(view: &DataViewIds) -> Vec<ControlId> {
        let mut children = vec![ControlId::from_raw(view.table)];
        if let Some(refresh) = view.refresh {
            children.push(ControlId::from_raw(refresh));
        }
        children.push(ControlId::from_raw(view.filter));
        children
    }

    /// Recompute row geometry for the currently visible tracks
    fn relayout(&mut self) {
        let visible: Vec<usize> = self.visible_track_indices();
        for (row, index) in visible.into_iter().enumerate() {
            let top = TRACKS_TOP + i32::try_from(row).unwrap_or(i32::MAX) * ROW_HEIGHT;
            let container_rect = Rect::new(0, top, TRACK_WIDTH, top + ROW_CONTENT);
            let title_rect = Rect::new(0, top, TITLE_WIDTH, top + TITLE_HEIGHT);
            let track = &self.tracks[index];
            let (container, title, panes) =
                (track.container, track.title, track.panes.clone());
            if let Some(node) = self.nodes.get_mut(&container) {
                node.rect = container_rect;
            }
            if let Some(node) = self.nodes.get_mut(&title) {
                node.rect = title_rect;
            }
            for (i, pane) in panes.iter().enumerate() {
                let pane_top = top + TITLE_HEIGHT + i32::try_from(i).unwrap_or(0) * 8;
                if let Some(node) = self.nodes.get_mut(pane) {
                    node.rect = Rect::new(TITLE_WIDTH, pane_top, TRACK_WIDTH, pane_top + 8);
                }
            }
        }
    }

    fn filter_text(&self) -> String {
        self.nodes
            .get(&self.filter_edit)
            .and_then(|node| node.texts.first().cloned())
            .unwrap_or_default()
    }

    fn visible_track_indices(&self) -> Vec<usize> {
        let filter = self.filter_text().to_lowercase();
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| {
                filter.is_empty() || track.spec.name.to_lowercase().contains(&filter)
            })
            .map(|(index, _)| index)
            .collect()
    }

    fn node(&self, id: ControlId) -> PulsarResult<&Node> {
        self.nodes
            .get(&id.raw())
            .ok_or(PulsarError::DetachedControl { id: id.raw() })
    }

    fn track_index_by_node(&self, id: u64) -> Option<usize> {
        self.tracks
            .iter()
            .position(|track| track.container == id || track.title == id)
    }

    fn select_track_node(&mut self, id: u64) {
        if let Some(index) = self.track_index_by_node(id) {
            if self.tracks[index].spec.selectable {
                self.focused_track = Some(self.tracks[index].container);
            }
        }
    }

    fn activate(&mut self, id: u64) -> PulsarResult<()> {
        if id == self.tab_item {
            self.current_tab = Some(names::CAPTURE_TAB_ITEM.to_string());
        } else if id == self.options_button {
            self.dialog_open = true;
        } else if id == self.ok_button {
            if self.dialog_open {
                self.dialog_open = false;
            }
        } else if id == self.checkbox {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.toggle_state = Some(!node.toggle_state.unwrap_or(false));
            }
        } else if id == self.toggle_button {
            self.toggle_capture();
        } else if id == self.filter_edit {
            self.focused_edit = Some(id);
        } else if self.track_index_by_node(id).is_some() {
            self.select_track_node(id);
        }
        // Clicks on inert controls (panes, toolbar chrome) do nothing
        Ok(())
    }

    fn toggle_capture(&mut self) {
        if self.capturing {
            self.capturing = false;
            self.capture_count += 1;
            if !self.capture_profile.is_empty() {
                self.replace_tracks_from_profile();
            }
        } else {
            self.capturing = true;
            self.collect_thread_states_at_start = self
                .nodes
                .get(&self.checkbox)
                .and_then(|node| node.toggle_state)
                .unwrap_or(false);
        }
    }

    fn replace_tracks_from_profile(&mut self) {
        for track in std::mem::take(&mut self.tracks) {
            self.nodes.remove(&track.container);
            self.nodes.remove(&track.title);
            for pane in track.panes {
                self.nodes.remove(&pane);
            }
        }
        self.focused_track = None;
        let profile = self.capture_profile.clone();
        let collect = self.collect_thread_states_at_start;
        for spec in profile {
            self.push_track(spec, collect);
        }
        self.relayout();
    }

    /// Drop `y` maps to the insertion slot: the dragged row lands after every
    /// other visible row whose center is above the drop point.
    fn reorder_track(&mut self, dragged: usize, drop_y: i32) {
        let visible = self.visible_track_indices();
        let insertion = visible
            .iter()
            .filter(|index| **index != dragged)
            .filter(|index| {
                self.nodes
                    .get(&self.tracks[**index].container)
                    .is_some_and(|node| node.rect.center().y < drop_y)
            })
            .count();
        let track = self.tracks.remove(dragged);
        let insertion = insertion.min(self.tracks.len());
        self.tracks.insert(insertion, track);
        self.relayout();
    }

    // ------------------------------------------------------------------
    // Inspection helpers for tests
    // ------------------------------------------------------------------

    /// Id of the time-graph control
    #[must_use]
    pub fn time_graph_id(&self) -> ControlId {
        ControlId::from_raw(self.time_graph)
    }

    /// Names of the currently visible tracks, in display order
    #[must_use]
    pub fn visible_track_names(&self) -> Vec<String> {
        self.visible_track_indices()
            .into_iter()
            .map(|index| self.tracks[index].spec.name.clone())
            .collect()
    }

    /// Tab most recently activated through its tab header
    #[must_use]
    pub fn current_tab(&self) -> Option<&str> {
        self.current_tab.as_deref()
    }

    /// Whether a capture is running
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Number of completed captures
    #[must_use]
    pub const fn capture_count(&self) -> u32 {
        self.capture_count
    }

    /// Whether the capture options dialog is open
    #[must_use]
    pub const fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }
}

impl UiDriver for MockUiDriver {
    fn root(&self) -> ControlId {
        ControlId::from_raw(self.root)
    }

    fn children(&self, id: ControlId) -> PulsarResult<Vec<ControlId>> {
        let raw = id.raw();
        self.node(id)?;
        if raw == self.root {
            return Ok(vec![ControlId::from_raw(self.window)]);
        }
        if raw == self.window {
            let mut children = vec![
                ControlId::from_raw(self.tab_item),
                ControlId::from_raw(self.tab_group),
            ];
            if self.dialog_open {
                children.push(ControlId::from_raw(self.dialog));
            }
            if let Some(view) = &self.data_view {
                children.push(ControlId::from_raw(view.panel));
            }
            return Ok(children);
        }
        if raw == self.tab_group {
            return Ok(vec![
                ControlId::from_raw(self.toolbar),
                ControlId::from_raw(self.time_graph),
            ]);
        }
        if raw == self.toolbar {
            return Ok(vec![
                ControlId::from_raw(self.options_button),
                ControlId::from_raw(self.toggle_button),
                ControlId::from_raw(self.filter_edit),
            ]);
        }
        if raw == self.time_graph {
            return Ok(self
                .visible_track_indices()
                .into_iter()
                .map(|index| ControlId::from_raw(self.tracks[index].container))
                .collect());
        }
        if raw == self.dialog {
            return Ok(vec![
                ControlId::from_raw(self.checkbox),
                ControlId::from_raw(self.ok_button),
            ]);
        }
        if let Some(view) = &self.data_view {
            if raw == view.panel {
                return Ok(Self::data_view_children(view));
            }
        }
        if let Some(index) = self.track_index_by_node(raw) {
            let track = &self.tracks[index];
            if raw == track.container {
                let mut children = vec![ControlId::from_raw(track.title)];
                children.extend(track.panes.iter().map(|pane| ControlId::from_raw(*pane)));
                return Ok(children);
            }
        }
        Ok(Vec::new())
    }

    fn info(&self, id: ControlId) -> PulsarResult<ControlInfo> {
        let node = self.node(id)?;
        let has_keyboard_focus =
            self.focused_track == Some(id.raw()) || self.focused_edit == Some(id.raw());
        Ok(ControlInfo {
            control_type: node.control_type,
            name: node.name.clone(),
            texts: node.texts.clone(),
            rect: node.rect,
            has_keyboard_focus,
            toggle_state: node.toggle_state,
            grid: node.grid,
            enabled: true,
        })
    }

    fn click_at(&mut self, point: Point, _button: MouseButton) -> PulsarResult<()> {
        let hit_node = |driver: &Self, id: u64| {
            driver
                .nodes
                .get(&id)
                .is_some_and(|node| node.rect.contains(point))
        };
        if self.dialog_open && DIALOG_RECT.contains(point) {
            for id in [self.checkbox, self.ok_button] {
                if hit_node(self, id) {
                    return self.activate(id);
                }
            }
            return Ok(());
        }
        for id in [
            self.tab_item,
            self.options_button,
            self.toggle_button,
            self.filter_edit,
        ] {
            if hit_node(self, id) {
                return self.activate(id);
            }
        }
        if TIME_GRAPH_RECT.contains(point) {
            let hit = self.visible_track_indices().into_iter().find(|index| {
                self.nodes
                    .get(&self.tracks[*index].container)
                    .is_some_and(|node| node.rect.contains(point))
            });
            match hit {
                Some(index) => {
                    let container = self.tracks[index].container;
                    self.select_track_node(container);
                }
                // Empty space between or above rows clears the selection
                None => self.focused_track = None,
            }
        }
        Ok(())
    }

    fn click(&mut self, id: ControlId) -> PulsarResult<()> {
        self.node(id)?;
        self.activate(id.raw())
    }

    fn drag(
        &mut self,
        from: Point,
        to: Point,
        _steps: u32,
        duration: Duration,
    ) -> PulsarResult<()> {
        self.clock += duration;
        let dragged = self.visible_track_indices().into_iter().find(|index| {
            let track = &self.tracks[*index];
            self.nodes
                .get(&track.container)
                .is_some_and(|node| node.rect.contains(from))
                || self
                    .nodes
                    .get(&track.title)
                    .is_some_and(|node| node.rect.contains(from))
        });
        if let Some(index) = dragged {
            self.reorder_track(index, to.y);
        }
        Ok(())
    }

    fn send_keys(&mut self, keys: &str) -> PulsarResult<()> {
        let Some(edit) = self.focused_edit else {
            return Err(PulsarError::InputError {
                message: "no edit control has keyboard focus".to_string(),
            });
        };
        if let Some(node) = self.nodes.get_mut(&edit) {
            match node.texts.first_mut() {
                Some(text) => text.push_str(keys),
                None => node.texts.push(keys.to_string()),
            }
        }
        if edit == self.filter_edit {
            self.relayout();
        }
        Ok(())
    }

    fn set_focus(&mut self, id: ControlId) -> PulsarResult<()> {
        let node = self.node(id)?;
        if node.control_type == ControlType::Edit {
            self.focused_edit = Some(id.raw());
        } else {
            self.select_track_node(id.raw());
        }
        Ok(())
    }

    fn set_edit_text(&mut self, id: ControlId, text: &str) -> PulsarResult<()> {
        let raw = id.raw();
        let node = self
            .nodes
            .get_mut(&raw)
            .ok_or(PulsarError::DetachedControl { id: raw })?;
        if node.control_type != ControlType::Edit {
            return Err(PulsarError::InputError {
                message: format!("control {id} is not an edit control"),
            });
        }
        node.texts = vec![text.to_string()];
        if raw == self.filter_edit {
            self.relayout();
        }
        Ok(())
    }

    fn toggle(&mut self, id: ControlId) -> PulsarResult<()> {
        let raw = id.raw();
        let node = self
            .nodes
            .get_mut(&raw)
            .ok_or(PulsarError::DetachedControl { id: raw })?;
        match node.toggle_state {
            Some(state) => {
                node.toggle_state = Some(!state);
                Ok(())
            }
            None => Err(PulsarError::InputError {
                message: format!("control {id} has no toggle state"),
            }),
        }
    }

    fn grid_item(&self, id: ControlId, row: usize, col: usize) -> PulsarResult<ControlId> {
        let view = self
            .data_view
            .as_ref()
            .filter(|view| view.table == id.raw())
            .ok_or(PulsarError::SessionError {
                message: format!("control {id} is not a grid"),
            })?;
        if row >= view.dims.rows || col >= view.dims.cols {
            return Err(PulsarError::SessionError {
                message: format!("cell ({row}, {col}) out of range"),
            });
        }
        view.cells
            .get(&(row, col))
            .map(|cell| ControlId::from_raw(*cell))
            .ok_or(PulsarError::SessionError {
                message: format!("cell ({row}, {col}) out of range"),
            })
    }

    fn sleep(&mut self, duration: Duration) {
        self.clock += duration;
    }

    fn now(&self) -> Duration {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> MockUiDriver {
        MockUiDriver::builder()
            .track(TrackSpec::new("Scheduler").selectable(false))
            .track(TrackSpec::new("gfx").timers(true))
            .track(TrackSpec::new("All Threads").events(true))
            .track(TrackSpec::new("hello_ggp_stand").timers(true).events(true))
            .build()
    }

    fn container_rect(driver: &MockUiDriver, index: usize) -> Rect {
        let id = driver.children(driver.time_graph_id()).unwrap()[index];
        driver.info(id).unwrap().rect
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_click_title_focuses_selectable_track() {
            let mut driver = driver();
            let tracks = driver.children(driver.time_graph_id()).unwrap();
            let title = driver.children(tracks[1]).unwrap()[0];
            driver.click(title).unwrap();
            assert!(driver.info(tracks[1]).unwrap().has_keyboard_focus);
        }

        #[test]
        fn test_unselectable_track_ignores_click() {
            let mut driver = driver();
            let tracks = driver.children(driver.time_graph_id()).unwrap();
            let title = driver.children(tracks[0]).unwrap()[0];
            driver.click(title).unwrap();
            assert!(!driver.info(tracks[0]).unwrap().has_keyboard_focus);
        }

        #[test]
        fn test_click_in_row_gap_clears_selection() {
            let mut driver = driver();
            let tracks = driver.children(driver.time_graph_id()).unwrap();
            driver.click(tracks[2]).unwrap();
            assert!(driver.info(tracks[2]).unwrap().has_keyboard_focus);

            let rect = container_rect(&driver, 2);
            driver
                .click_at(Point::new(rect.left + 10, rect.top - 5), MouseButton::Left)
                .unwrap();
            assert!(!driver.info(tracks[2]).unwrap().has_keyboard_focus);
        }
    }

    mod reorder_tests {
        use super::*;

        #[test]
        fn test_drag_to_top() {
            let mut driver = driver();
            let target = container_rect(&driver, 0);
            let from = container_rect(&driver, 3).center();
            driver
                .drag(
                    from,
                    Point::new(from.x, target.top - 1),
                    10,
                    Duration::from_millis(500),
                )
                .unwrap();
            assert_eq!(
                driver.visible_track_names(),
                vec!["hello_ggp_stand", "Scheduler", "gfx", "All Threads"]
            );
        }

        #[test]
        fn test_drag_downwards() {
            let mut driver = driver();
            let target = container_rect(&driver, 2);
            let from = container_rect(&driver, 0).center();
            driver
                .drag(
                    from,
                    Point::new(from.x, target.bottom + 1),
                    10,
                    Duration::from_millis(500),
                )
                .unwrap();
            assert_eq!(
                driver.visible_track_names(),
                vec!["gfx", "All Threads", "Scheduler", "hello_ggp_stand"]
            );
        }

        #[test]
        fn test_track_ids_stable_across_reorder() {
            let mut driver = driver();
            let before = driver.children(driver.time_graph_id()).unwrap();
            let target = container_rect(&driver, 0);
            let from = container_rect(&driver, 3).center();
            driver
                .drag(
                    from,
                    Point::new(from.x, target.top - 1),
                    10,
                    Duration::from_millis(500),
                )
                .unwrap();
            let after = driver.children(driver.time_graph_id()).unwrap();
            assert_eq!(after[0], before[3]);
            assert_eq!(after[1], before[0]);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_filter_is_case_insensitive() {
            let mut driver = driver();
            let filter = ControlId::from_raw(driver.filter_edit);
            driver.set_focus(filter).unwrap();
            driver.send_keys("Hello").unwrap();
            assert_eq!(driver.visible_track_names(), vec!["hello_ggp_stand"]);
        }

        #[test]
        fn test_clearing_filter_restores_tracks() {
            let mut driver = driver();
            let filter = ControlId::from_raw(driver.filter_edit);
            driver.set_edit_text(filter, "gfx").unwrap();
            assert_eq!(driver.visible_track_names(), vec!["gfx"]);
            driver.set_edit_text(filter, "").unwrap();
            assert_eq!(driver.visible_track_names().len(), 4);
        }

        #[test]
        fn test_filtered_rows_are_relayered_from_top() {
            let mut driver = driver();
            let filter = ControlId::from_raw(driver.filter_edit);
            driver.set_edit_text(filter, "hello").unwrap();
            let rect = container_rect(&driver, 0);
            assert_eq!(rect.top, TRACKS_TOP);
        }
    }

    mod capture_tests {
        use super::*;

        fn capture_driver() -> MockUiDriver {
            MockUiDriver::builder()
                .capture_profile(vec![
                    TrackSpec::new("Scheduler").selectable(false),
                    TrackSpec::new("All Threads").events(true).thread_states(true),
                ])
                .build()
        }

        #[test]
        fn test_toggle_capture_populates_tracks() {
            let mut driver = capture_driver();
            let toggle = ControlId::from_raw(driver.toggle_button);
            assert!(driver.visible_track_names().is_empty());
            driver.click(toggle).unwrap();
            assert!(driver.is_capturing());
            driver.sleep(Duration::from_secs(5));
            driver.click(toggle).unwrap();
            assert!(!driver.is_capturing());
            assert_eq!(driver.capture_count(), 1);
            assert_eq!(
                driver.visible_track_names(),
                vec!["Scheduler", "All Threads"]
            );
        }

        #[test]
        fn test_thread_states_gated_by_checkbox_at_start() {
            let mut driver = capture_driver();
            let toggle = ControlId::from_raw(driver.toggle_button);
            let checkbox = ControlId::from_raw(driver.checkbox);

            driver.click(checkbox).unwrap();
            assert_eq!(driver.info(checkbox).unwrap().toggle_state, Some(true));

            driver.click(toggle).unwrap();
            driver.click(toggle).unwrap();

            let tracks = driver.children(driver.time_graph_id()).unwrap();
            let panes: Vec<String> = driver
                .children(tracks[1])
                .unwrap()
                .iter()
                .skip(1)
                .map(|id| driver.info(*id).unwrap().name)
                .collect();
            assert!(panes.contains(&"ThreadStates".to_string()));
        }

        #[test]
        fn test_dialog_opens_and_closes() {
            let mut driver = capture_driver();
            let options = ControlId::from_raw(driver.options_button);
            let ok = ControlId::from_raw(driver.ok_button);
            assert!(!driver.is_dialog_open());
            driver.click(options).unwrap();
            assert!(driver.is_dialog_open());
            driver.click(ok).unwrap();
            assert!(!driver.is_dialog_open());
        }
    }

    mod grid_tests {
        use super::*;

        #[test]
        fn test_grid_cells_by_position() {
            let driver = MockUiDriver::builder()
                .data_view(DataViewSpec::new(
                    "LiveTab",
                    vec![
                        vec!["main".to_string(), "100".to_string()],
                        vec!["worker".to_string(), "250".to_string()],
                    ],
                ))
                .build();
            let view = driver.data_view.as_ref().unwrap();
            let table = ControlId::from_raw(view.table);
            let cell = driver.grid_item(table, 1, 0).unwrap();
            assert_eq!(driver.info(cell).unwrap().name, "worker");
            assert!(driver.grid_item(table, 5, 0).is_err());
        }

        #[test]
        fn test_grid_item_never_resolves_panel_chrome() {
            let driver = MockUiDriver::builder()
                .data_view(DataViewSpec::new(
                    "LiveTab",
                    vec![vec!["main".to_string(), "100".to_string()]],
                ))
                .build();
            let view = driver.data_view.as_ref().unwrap();
            let table = ControlId::from_raw(view.table);
            // The filter edit and refresh button sit next to the table but
            // must stay unreachable through cell coordinates.
            assert!(driver.grid_item(table, usize::MAX, 0).is_err());
            assert!(driver.grid_item(table, usize::MAX, 1).is_err());
            assert!(driver.grid_item(table, 0, usize::MAX).is_err());
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn six_track_driver() -> MockUiDriver {
            let mut builder = MockUiDriver::builder();
            for name in ["t0", "t1", "t2", "t3", "t4", "t5"] {
                builder = builder.track(TrackSpec::new(name));
            }
            builder.build()
        }

        proptest! {
            #[test]
            fn prop_drag_lands_on_requested_slot(from in 0usize..6, to in 0usize..6) {
                let mut driver = six_track_driver();
                let rows = driver.children(driver.time_graph_id()).unwrap();
                let dragged = rows[from];
                let target = driver.info(rows[to]).unwrap().rect;
                let drop_y = if from > to { target.top - 1 } else { target.bottom + 1 };
                let start = driver.info(dragged).unwrap().rect.center();
                driver
                    .drag(
                        start,
                        Point::new(start.x, drop_y),
                        10,
                        Duration::from_millis(500),
                    )
                    .unwrap();
                let after = driver.children(driver.time_graph_id()).unwrap();
                prop_assert_eq!(after.iter().position(|id| *id == dragged), Some(to));
            }
        }
    }

    #[test]
    fn test_virtual_clock() {
        let mut driver = driver();
        let before = driver.now();
        driver.sleep(Duration::from_secs(5));
        assert_eq!(driver.now() - before, Duration::from_secs(5));
    }
}
