use crate::capture::names;
use crate::control::{ControlId, ControlType};
use crate::query::ControlQuery;
use crate::result::{PulsarError, PulsarResult};
use crate::session::Session;

/// A tabular data-view panel (live functions, sampling reports and the like).
///
/// The table exposes its cells only through the grid pattern, not as tree
/// children, so all cell access goes through row and column coordinates.
#[derive(Debug)]
pub struct DataViewPanel {
    table: ControlId,
    refresh_button: Option<ControlId>,
    filter_edit: Option<ControlId>,
}

impl DataViewPanel {
    /// Resolve the table and optional chrome inside `panel`
    pub fn locate(session: &mut Session, panel: ControlId) -> PulsarResult<Self> {
        let table = session.find_control(
            panel,
            &ControlQuery::of_type(ControlType::Tree).named(names::DATA_VIEW_TABLE),
        )?;
        let refresh_button = session.try_find_control(
            panel,
            &ControlQuery::of_type(ControlType::Button).named(names::REFRESH_BUTTON),
        )?;
        let filter_edit = session.try_find_control(
            panel,
            &ControlQuery::of_type(ControlType::Edit).named(names::DATA_VIEW_FILTER_EDIT),
        )?;
        Ok(Self {
            table,
            refresh_button,
            filter_edit,
        })
    }

    /// Number of data rows
    pub fn row_count(&self, session: &Session) -> PulsarResult<usize> {
        Ok(session.info(self.table)?.grid.map_or(0, |grid| grid.rows))
    }

    /// Number of columns
    pub fn column_count(&self, session: &Session) -> PulsarResult<usize> {
        Ok(session.info(self.table)?.grid.map_or(0, |grid| grid.cols))
    }

    /// Text of the cell at `row`, `col`
    pub fn item_text(&self, session: &mut Session, row: usize, col: usize) -> PulsarResult<String> {
        let cell = session.driver().grid_item(self.table, row, col)?;
        Ok(session.info(cell)?.display_text().to_string())
    }

    /// First row whose cell in `col` equals `text`
    pub fn find_row(
        &self,
        session: &mut Session,
        col: usize,
        text: &str,
    ) -> PulsarResult<Option<usize>> {
        self.find_row_by(session, col, |cell| cell == text)
    }

    /// First row whose cell in `col` contains `fragment`
    pub fn find_row_containing(
        &self,
        session: &mut Session,
        col: usize,
        fragment: &str,
    ) -> PulsarResult<Option<usize>> {
        self.find_row_by(session, col, |cell| cell.contains(fragment))
    }

    fn find_row_by(
        &self,
        session: &mut Session,
        col: usize,
        mut matches: impl FnMut(&str) -> bool,
    ) -> PulsarResult<Option<usize>> {
        let rows = self.row_count(session)?;
        for row in 0..rows {
            if matches(&self.item_text(session, row, col)?) {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Click the refresh button
    pub fn refresh(&self, session: &mut Session) -> PulsarResult<()> {
        let button = self
            .refresh_button
            .ok_or_else(|| PulsarError::SessionError {
                message: "panel has no refresh button".to_string(),
            })?;
        session.click(button)
    }

    /// Replace the panel filter contents
    pub fn set_filter(&self, session: &mut Session, text: &str) -> PulsarResult<()> {
        let edit = self.filter_edit.ok_or_else(|| PulsarError::SessionError {
            message: "panel has no filter edit".to_string(),
        })?;
        session.set_edit_text(edit, text)
    }
}
