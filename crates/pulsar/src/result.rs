//! Result and error types for Pulsar.

use thiserror::Error;

/// Result type for Pulsar operations
pub type PulsarResult<T> = Result<T, PulsarError>;

/// Errors that can occur while driving the UI
#[derive(Debug, Error)]
pub enum PulsarError {
    /// No control matched a query within the wait deadline
    #[error("Control not found: {query} (searched under {scope})")]
    ControlNotFound {
        /// Description of the failed query
        query: String,
        /// Description of the search scope
        scope: String,
    },

    /// More than one control matched a strict query
    #[error("Ambiguous match: {query} matched {count} controls")]
    AmbiguousMatch {
        /// Description of the query
        query: String,
        /// Number of controls that matched
        count: usize,
    },

    /// A control handle no longer refers to a live element
    #[error("Control {id} is no longer attached to the UI tree")]
    DetachedControl {
        /// The stale handle
        id: u64,
    },

    /// Input synthesis error
    #[error("Input synthesis failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Assertion failed outside of recorded expectations
    #[error("Assertion error: {message}")]
    AssertionError {
        /// Error message
        message: String,
    },

    /// A test case was constructed with inconsistent parameters
    #[error("Invalid scenario arguments: {message}")]
    InvalidArguments {
        /// Error message
        message: String,
    },

    /// Session-level error (window lookup, driver state)
    #[error("Session error: {message}")]
    SessionError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
