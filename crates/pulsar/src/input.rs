//! Input synthesis types.
//!
//! Clicks, drags, and key sequences are described here and synthesized by the
//! active [`UiDriver`](crate::control::UiDriver). Text entry goes through
//! `send_keys` rather than direct text assignment so focus and wait timing
//! behave like real typing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::control::Point;

/// Mouse button for click and drag synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left (primary) button
    Left,
    /// Right (secondary) button
    Right,
    /// Middle button
    Middle,
}

impl Default for MouseButton {
    fn default() -> Self {
        Self::Left
    }
}

/// A drag gesture towards a target point
#[derive(Debug, Clone, Copy)]
pub struct DragOperation {
    /// Target point in screen coordinates
    pub target: Point,
    /// Number of intermediate move events
    pub steps: u32,
    /// Total duration of the drag
    pub duration: Duration,
}

impl DragOperation {
    /// Create a drag towards `target` with default pacing
    #[must_use]
    pub fn to(target: Point) -> Self {
        Self {
            target,
            steps: 10,
            duration: Duration::from_millis(500),
        }
    }

    /// Set the number of intermediate steps
    #[must_use]
    pub const fn steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Set the total duration
    #[must_use]
    pub const fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}
