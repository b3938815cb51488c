//! Error types for the profiler's fallible queries.

use thiserror::Error;

/// Errors returned by profiler history queries.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfilerError {
    /// A historical frame was requested further back than the history holds.
    #[error("frame {requested} ago is out of range ({available} frames retained)")]
    HistoryIndexOutOfRange {
        /// The `frames_ago` index that was requested.
        requested: usize,
        /// How many frames the history currently retains.
        available: usize,
    },
}
