//! Application session.
//!
//! One session per suite run: the driver plus the resolved top window of the
//! application under test. Test code goes through the session for lookups and
//! input so scoping and wait defaults stay in one place.

use std::time::Duration;

use crate::control::{ControlId, ControlInfo, ControlType, Point, UiDriver};
use crate::input::{DragOperation, MouseButton};
use crate::query::{self, ControlQuery, FindOptions};
use crate::result::PulsarResult;

/// A live UI-automation session against one application window
#[derive(Debug)]
pub struct Session {
    driver: Box<dyn UiDriver>,
    top_window: ControlId,
    find_options: FindOptions,
}

impl Session {
    /// Attach to the application window with the given title.
    ///
    /// # Errors
    ///
    /// Fails when no `Window` control with that title appears under the
    /// driver root within the default wait deadline.
    pub fn attach(mut driver: Box<dyn UiDriver>, window_title: &str) -> PulsarResult<Self> {
        let root = driver.root();
        let query = ControlQuery::of_type(ControlType::Window).named(window_title);
        let top_window =
            query::find_control(driver.as_mut(), root, &query, FindOptions::default())?;
        tracing::debug!(window = window_title, %top_window, "attached to application window");
        Ok(Self {
            driver,
            top_window,
            find_options: FindOptions::default(),
        })
    }

    /// Replace the default find options for this session
    #[must_use]
    pub const fn with_find_options(mut self, options: FindOptions) -> Self {
        self.find_options = options;
        self
    }

    /// Top window of the application under test
    #[must_use]
    pub const fn top_window(&self) -> ControlId {
        self.top_window
    }

    /// Direct driver access for input synthesis
    pub fn driver(&mut self) -> &mut dyn UiDriver {
        self.driver.as_mut()
    }

    /// Find exactly one control under `scope`, auto-waiting
    pub fn find_control(
        &mut self,
        scope: ControlId,
        query: &ControlQuery,
    ) -> PulsarResult<ControlId> {
        query::find_control(self.driver.as_mut(), scope, query, self.find_options)
    }

    /// One-shot lookup under `scope`, `None` when absent
    pub fn try_find_control(
        &self,
        scope: ControlId,
        query: &ControlQuery,
    ) -> PulsarResult<Option<ControlId>> {
        query::try_find_control(self.driver.as_ref(), scope, query)
    }

    /// Every control under `scope` matching the query
    pub fn find_all(
        &self,
        scope: ControlId,
        query: &ControlQuery,
    ) -> PulsarResult<Vec<ControlId>> {
        query::find_all(self.driver.as_ref(), scope, query)
    }

    /// Snapshot of a control's state
    pub fn info(&self, id: ControlId) -> PulsarResult<ControlInfo> {
        self.driver.info(id)
    }

    /// Visible children of a control
    pub fn children(&self, id: ControlId) -> PulsarResult<Vec<ControlId>> {
        self.driver.children(id)
    }

    /// Click a control at its clickable point
    pub fn click(&mut self, id: ControlId) -> PulsarResult<()> {
        self.driver.click(id)
    }

    /// Click at a screen coordinate
    pub fn click_at(&mut self, point: Point, button: MouseButton) -> PulsarResult<()> {
        self.driver.click_at(point, button)
    }

    /// Drag from a point according to the drag operation
    pub fn drag(&mut self, from: Point, drag: DragOperation) -> PulsarResult<()> {
        self.driver.drag(from, drag.target, drag.steps, drag.duration)
    }

    /// Type a key sequence into the focused control
    pub fn send_keys(&mut self, keys: &str) -> PulsarResult<()> {
        self.driver.send_keys(keys)
    }

    /// Focus a control
    pub fn set_focus(&mut self, id: ControlId) -> PulsarResult<()> {
        self.driver.set_focus(id)
    }

    /// Replace the text of an edit control
    pub fn set_edit_text(&mut self, id: ControlId, text: &str) -> PulsarResult<()> {
        self.driver.set_edit_text(id, text)
    }

    /// Block for a fixed duration on the driver clock
    pub fn sleep(&mut self, duration: Duration) {
        self.driver.sleep(duration);
    }
}
