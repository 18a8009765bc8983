//! Page objects for the profiler capture window.
//!
//! Thin wrappers over the raw control tree: each type resolves the controls
//! it needs by class and accessible name and exposes domain-level accessors
//! (tracks, panes, the track filter) to the test scenarios.

mod data_view;
mod track;
mod window;

pub use data_view::DataViewPanel;
pub use track::{names_match, Track};
pub use window::CaptureWindow;

/// Accessible names of the capture-window controls
pub mod names {
    /// Rendered time-graph surface holding the track rows
    pub const TIME_GRAPH: &str = "TimeGraph";
    /// Toolbar above the time graph
    pub const CAPTURE_TOOLBAR: &str = "CaptureToolBar";
    /// Track filter input on the toolbar
    pub const FILTER_TRACKS_EDIT: &str = "FilterTracks";
    /// Tab header that shows the capture view
    pub const CAPTURE_TAB_ITEM: &str = "Capture";
    /// Content group of the capture tab
    pub const CAPTURE_TAB_GROUP: &str = "CaptureTab";
    /// Button opening the capture options dialog
    pub const CAPTURE_OPTIONS_BUTTON: &str = "Capture Options";
    /// The capture options dialog window
    pub const CAPTURE_OPTIONS_DIALOG: &str = "Capture Options";
    /// Thread-state collection checkbox inside the options dialog
    pub const COLLECT_THREAD_STATES_CHECKBOX: &str = "Collect thread states";
    /// Dialog confirmation button
    pub const OK_BUTTON: &str = "OK";
    /// Button starting and stopping a capture
    pub const TOGGLE_CAPTURE_BUTTON: &str = "Toggle Capture";
    /// Per-track sampling events pane
    pub const EVENTS_PANE: &str = "Events";
    /// Per-track thread-state pane
    pub const THREAD_STATES_PANE: &str = "ThreadStates";
    /// Per-track tracepoints pane
    pub const TRACEPOINTS_PANE: &str = "Tracepoints";
    /// Per-track timers pane
    pub const TIMERS_PANE: &str = "Timers";
    /// Table control inside a data-view panel
    pub const DATA_VIEW_TABLE: &str = "DataView";
    /// Data-view refresh button
    pub const REFRESH_BUTTON: &str = "Refresh";
    /// Data-view filter input
    pub const DATA_VIEW_FILTER_EDIT: &str = "Filter";
}
