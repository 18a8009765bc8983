//! UI control model and the driver seam.
//!
//! Controls are addressed by opaque [`ControlId`] handles handed out by a
//! [`UiDriver`]. A handle stays valid for the lifetime of the underlying
//! element, across reorders and visibility changes, so test code can hold a
//! handle, act on the UI, and re-query the same element afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::input::MouseButton;
use crate::result::PulsarResult;

/// Native control classes exposed through the accessibility tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlType {
    /// Top-level or dialog window
    Window,
    /// Rendered image surface (the time graph is one)
    Image,
    /// Tab header item
    TabItem,
    /// Grouping container
    Group,
    /// Push button
    Button,
    /// Two-state checkbox
    CheckBox,
    /// Single-line text input
    Edit,
    /// Toolbar container
    ToolBar,
    /// Generic pane
    Pane,
    /// Tree/table control
    Tree,
    /// Anything the backend cannot classify
    Custom,
}

impl ControlType {
    /// Stable name used in queries and error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Window => "Window",
            Self::Image => "Image",
            Self::TabItem => "TabItem",
            Self::Group => "Group",
            Self::Button => "Button",
            Self::CheckBox => "CheckBox",
            Self::Edit => "Edit",
            Self::ToolBar => "ToolBar",
            Self::Pane => "Pane",
            Self::Tree => "Tree",
            Self::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge (exclusive)
    pub right: i32,
    /// Bottom edge (exclusive)
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the rectangle
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height of the rectangle
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Center point
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Check whether a point falls inside the rectangle
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

/// Opaque handle to a control in the driver's tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(u64);

impl ControlId {
    /// Create a handle from a raw driver id
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw driver id
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Row and column counts of a table control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

/// Snapshot of a control's observable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInfo {
    /// Control class
    pub control_type: ControlType,
    /// Accessible name
    pub name: String,
    /// Visible text fragments, first entry is the display label
    pub texts: Vec<String>,
    /// Screen rectangle
    pub rect: Rect,
    /// Whether the control currently holds keyboard focus
    pub has_keyboard_focus: bool,
    /// Checked state for two-state controls, `None` otherwise
    pub toggle_state: Option<bool>,
    /// Grid dimensions for table controls, `None` otherwise
    pub grid: Option<GridDims>,
    /// Whether the control accepts interaction
    pub enabled: bool,
}

impl ControlInfo {
    /// First visible text fragment, falling back to the accessible name
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.texts.first().map_or(self.name.as_str(), String::as_str)
    }
}

/// Backend seam: locating controls and synthesizing input.
///
/// Production backends wrap a platform accessibility API; tests use the
/// deterministic [`MockUiDriver`](crate::mock::MockUiDriver). All methods are
/// synchronous, matching the single UI session being driven.
pub trait UiDriver: std::fmt::Debug {
    /// Root of the control tree (the desktop)
    fn root(&self) -> ControlId;

    /// Visible children of a control, in document order
    fn children(&self, id: ControlId) -> PulsarResult<Vec<ControlId>>;

    /// Current state of a control
    fn info(&self, id: ControlId) -> PulsarResult<ControlInfo>;

    /// Click at a screen coordinate
    fn click_at(&mut self, point: Point, button: MouseButton) -> PulsarResult<()>;

    /// Click a control at its clickable point
    fn click(&mut self, id: ControlId) -> PulsarResult<()>;

    /// Press at `from`, move to `to` in `steps` increments over `duration`, release
    fn drag(
        &mut self,
        from: Point,
        to: Point,
        steps: u32,
        duration: Duration,
    ) -> PulsarResult<()>;

    /// Type a key sequence into the focused control
    fn send_keys(&mut self, keys: &str) -> PulsarResult<()>;

    /// Give a control keyboard focus
    fn set_focus(&mut self, id: ControlId) -> PulsarResult<()>;

    /// Replace the text of an edit control
    fn set_edit_text(&mut self, id: ControlId, text: &str) -> PulsarResult<()>;

    /// Flip the state of a two-state control
    fn toggle(&mut self, id: ControlId) -> PulsarResult<()>;

    /// Cell of a table control by row and column
    fn grid_item(&self, id: ControlId, row: usize, col: usize) -> PulsarResult<ControlId>;

    /// Block for a fixed duration (virtual time in the mock driver)
    fn sleep(&mut self, duration: Duration);

    /// Monotonic clock, consistent with [`sleep`](UiDriver::sleep)
    fn now(&self) -> Duration;
}
