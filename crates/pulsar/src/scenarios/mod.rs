//! Ready-made test cases for the capture window.
//!
//! Each scenario is a [`crate::harness::TestCase`] with its parameters held
//! in the struct, so suites read as data:
//!
//! ```
//! use pulsar::harness::Suite;
//! use pulsar::scenarios::{FilterTracks, SelectTrack};
//!
//! let suite = Suite::new("track interaction")
//!     .with_case(SelectTrack::new(1))
//!     .with_case(FilterTracks::new("gfx", 1));
//! ```

mod capture;
mod tracks;

pub use crate::capture::names_match;
pub use capture::{Capture, CheckEvents, CheckThreadStates, CheckTimers};
pub use tracks::{DeselectTrack, FilterTracks, MatchTracks, MoveTrack, NameMatcher, SelectTrack};
