//! Operation results and the aggregation rule that merges two of them.

use std::fmt;

use serde::Serialize;

use crate::github::RelayError;

/// Message used when both combined operations failed.
pub const BOTH_FAILED_MESSAGE: &str = "Unable to post comment or update status";

/// Outcome of a single relay operation.
///
/// Every remote-call wrapper returns this value instead of an error, so
/// callers always get a verdict they can report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded or was deliberately skipped.
    pub ok: bool,
    /// Human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set when nothing was sent to GitHub.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

impl OperationResult {
    /// A successful operation.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            skipped: false,
        }
    }

    /// A failed operation.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            skipped: false,
        }
    }

    /// An operation that was not attempted. Counts as success.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(reason.into()),
            skipped: true,
        }
    }

    /// Message text, empty when absent.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

impl From<RelayError> for OperationResult {
    fn from(error: RelayError) -> Self {
        Self::failure(error.to_string())
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match (self.ok, self.skipped) {
            (true, true) => "skipped",
            (true, false) => "ok",
            (false, _) => "failed",
        };
        match self.message.as_deref() {
            Some(message) => write!(formatter, "{verdict}: {message}"),
            None => formatter.write_str(verdict),
        }
    }
}

/// Merges the status and comment results into one verdict.
///
/// When both succeed the status result is returned unchanged. Otherwise the
/// message names whichever operation failed.
#[must_use]
pub fn aggregate(status: OperationResult, comment: OperationResult) -> OperationResult {
    match (status.ok, comment.ok) {
        (true, true) => status,
        (false, false) => OperationResult::failure(BOTH_FAILED_MESSAGE),
        (false, true) => OperationResult::failure(format!(
            "Unable to update status: {}",
            status.message()
        )),
        (true, false) => OperationResult::failure(format!(
            "Unable to post comment: {}",
            comment.message()
        )),
    }
}
