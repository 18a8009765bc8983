//! Control lookup.
//!
//! Queries select controls by class and name, searched recursively from a
//! scope control. Lookups auto-wait: the tree is re-scanned on a polling
//! interval until a match appears or the deadline passes. Strict mode rejects
//! ambiguous matches instead of silently picking one.

use crate::control::{ControlId, ControlType, UiDriver};
use crate::result::{PulsarError, PulsarResult};
use crate::wait::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS, WaitOptions};

/// A query over the control tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlQuery {
    control_type: Option<ControlType>,
    name: Option<String>,
    name_contains: Option<String>,
}

impl ControlQuery {
    /// Create an empty query matching every control
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query by control class
    #[must_use]
    pub fn of_type(control_type: ControlType) -> Self {
        Self {
            control_type: Some(control_type),
            ..Self::default()
        }
    }

    /// Restrict to an exact accessible name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict to names containing a substring
    #[must_use]
    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Check a single control against the query
    fn matches(&self, driver: &dyn UiDriver, id: ControlId) -> PulsarResult<bool> {
        let info = driver.info(id)?;
        if let Some(control_type) = self.control_type {
            if info.control_type != control_type {
                return Ok(false);
            }
        }
        if let Some(name) = &self.name {
            if info.name != *name {
                return Ok(false);
            }
        }
        if let Some(fragment) = &self.name_contains {
            if !info.name.contains(fragment.as_str()) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl std::fmt::Display for ControlQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let type_name = self
            .control_type
            .map_or("<any>", |control_type| control_type.as_str());
        write!(f, "{type_name}")?;
        if let Some(name) = &self.name {
            write!(f, " \"{name}\"")?;
        }
        if let Some(fragment) = &self.name_contains {
            write!(f, " *\"{fragment}\"*")?;
        }
        Ok(())
    }
}

/// Options controlling lookup behavior
#[derive(Debug, Clone, Copy)]
pub struct FindOptions {
    /// Auto-wait settings
    pub wait: WaitOptions,
    /// Fail on more than one match
    pub strict: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            wait: WaitOptions {
                timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            },
            strict: true,
        }
    }
}

impl FindOptions {
    /// Create find options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auto-wait timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait.timeout_ms = timeout_ms;
        self
    }

    /// Disable the multiple-match check
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Collect every descendant of `scope` matching the query, in document order.
///
/// The scope control itself is not considered.
pub fn find_all(
    driver: &dyn UiDriver,
    scope: ControlId,
    query: &ControlQuery,
) -> PulsarResult<Vec<ControlId>> {
    let mut matches = Vec::new();
    let mut stack = driver.children(scope)?;
    stack.reverse();
    while let Some(id) = stack.pop() {
        if query.matches(driver, id)? {
            matches.push(id);
        }
        let mut children = driver.children(id)?;
        children.reverse();
        stack.extend(children);
    }
    Ok(matches)
}

/// Find exactly one control, auto-waiting until it appears.
///
/// # Errors
///
/// [`PulsarError::ControlNotFound`] when nothing matches within the deadline,
/// [`PulsarError::AmbiguousMatch`] when strict mode sees several matches.
pub fn find_control(
    driver: &mut dyn UiDriver,
    scope: ControlId,
    query: &ControlQuery,
    options: FindOptions,
) -> PulsarResult<ControlId> {
    let start = driver.now();
    loop {
        let matches = find_all(driver, scope, query)?;
        match matches.len() {
            0 => {}
            1 => return Ok(matches[0]),
            count if options.strict => {
                return Err(PulsarError::AmbiguousMatch {
                    query: query.to_string(),
                    count,
                })
            }
            _ => return Ok(matches[0]),
        }
        if driver.now().saturating_sub(start) >= options.wait.timeout() {
            return Err(PulsarError::ControlNotFound {
                query: query.to_string(),
                scope: scope.to_string(),
            });
        }
        driver.sleep(options.wait.poll_interval());
    }
}

/// One-shot lookup returning `None` when nothing matches.
///
/// No auto-wait: absence is an expected answer here (optional panes), not a
/// synchronization problem.
pub fn try_find_control(
    driver: &dyn UiDriver,
    scope: ControlId,
    query: &ControlQuery,
) -> PulsarResult<Option<ControlId>> {
    let matches = find_all(driver, scope, query)?;
    Ok(matches.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockUiDriver, TrackSpec};

    fn driver_with_tracks() -> MockUiDriver {
        MockUiDriver::builder()
            .track(TrackSpec::new("Scheduler").selectable(false))
            .track(TrackSpec::new("gfx").timers(true))
            .track(TrackSpec::new("hello_ggp_stand").timers(true).events(true))
            .build()
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_display_format() {
            let query = ControlQuery::of_type(ControlType::Edit).named("FilterTracks");
            assert_eq!(query.to_string(), "Edit \"FilterTracks\"");

            let query = ControlQuery::new().name_contains("ggp");
            assert_eq!(query.to_string(), "<any> *\"ggp\"*");
        }
    }

    mod find_tests {
        use super::*;

        #[test]
        fn test_find_all_in_document_order() {
            let driver = driver_with_tracks();
            let time_graph = driver.time_graph_id();
            let tracks = find_all(&driver, time_graph, &ControlQuery::new()).unwrap();
            // Containers plus their titles and panes, containers first per row
            let names: Vec<String> = tracks
                .iter()
                .map(|id| driver.info(*id).unwrap().name)
                .collect();
            let scheduler = names.iter().position(|n| n == "Scheduler").unwrap();
            let gfx = names.iter().position(|n| n == "gfx").unwrap();
            assert!(scheduler < gfx);
        }

        #[test]
        fn test_find_control_by_type_and_name() {
            let mut driver = driver_with_tracks();
            let root = driver.root();
            let query = ControlQuery::of_type(ControlType::Edit).named("FilterTracks");
            let id = find_control(&mut driver, root, &query, FindOptions::default()).unwrap();
            assert_eq!(driver.info(id).unwrap().name, "FilterTracks");
        }

        #[test]
        fn test_find_control_not_found_times_out() {
            let mut driver = driver_with_tracks();
            let root = driver.root();
            let query = ControlQuery::of_type(ControlType::Button).named("No Such Button");
            let before = driver.now();
            let result = find_control(&mut driver, root, &query, FindOptions::default());
            assert!(matches!(result, Err(PulsarError::ControlNotFound { .. })));
            // The deadline elapsed on the virtual clock
            assert!(driver.now() > before);
        }

        #[test]
        fn test_strict_rejects_ambiguity() {
            let mut driver = driver_with_tracks();
            let time_graph = driver.time_graph_id();
            let query = ControlQuery::of_type(ControlType::TabItem);
            let result = find_control(&mut driver, time_graph, &query, FindOptions::default());
            assert!(matches!(
                result,
                Err(PulsarError::AmbiguousMatch { count: 3, .. })
            ));
        }

        #[test]
        fn test_non_strict_picks_first() {
            let mut driver = driver_with_tracks();
            let time_graph = driver.time_graph_id();
            let query = ControlQuery::of_type(ControlType::TabItem);
            let options = FindOptions::default().with_strict(false);
            let id = find_control(&mut driver, time_graph, &query, options).unwrap();
            assert_eq!(driver.info(id).unwrap().name, "Scheduler");
        }

        #[test]
        fn test_try_find_absent_is_none() {
            let driver = driver_with_tracks();
            let root = driver.root();
            let query = ControlQuery::of_type(ControlType::Pane).named("ThreadStates");
            assert!(try_find_control(&driver, root, &query).unwrap().is_none());
        }
    }
}
