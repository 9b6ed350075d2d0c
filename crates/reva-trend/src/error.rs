//! Error types for trend analysis.

use thiserror::Error;

/// Errors raised by window-set validation.
///
/// All of these indicate a caller configuration mistake; they are checked
/// once per `analyze` call, before any counting, so a failure can never
/// leave behind a partially-computed report.
#[derive(Debug, Error)]
pub enum TrendError {
    /// A window's start is not strictly before its end.
    #[error("time window '{label}' is empty or inverted")]
    EmptyWindow {
        /// Label of the offending window.
        label: String,
    },

    /// Windows are not in chronological order.
    #[error("time windows '{first}' and '{second}' are out of chronological order")]
    UnorderedWindows {
        /// Label of the earlier-listed window.
        first: String,
        /// Label of the later-listed window that starts before it.
        second: String,
    },

    /// Two windows overlap in time.
    #[error("time windows '{first}' and '{second}' overlap")]
    OverlappingWindows {
        /// Label of the earlier window.
        first: String,
        /// Label of the overlapping window.
        second: String,
    },

    /// Two windows share the same label.
    #[error("duplicate time window label '{label}'")]
    DuplicateWindowLabel {
        /// The repeated label.
        label: String,
    },
}
