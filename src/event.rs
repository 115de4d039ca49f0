//! Analysis events delivered by the webhook layer.
//!
//! The payload arrives as an untyped JSON record. [`AnalysisEvent::from_payload`]
//! extracts and validates every field up front so a malformed event is
//! rejected before any remote call is attempted.

use std::fmt;

use serde_json::{Map, Value};

use crate::github::{CommitRef, PullRequestNumber, RelayError, RepositorySlug};

/// Lifecycle state declared by an analysis event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisState {
    /// Analysis has started.
    Pending,
    /// Analysis finished and results are available.
    Success,
    /// Any other state; ignored by the relay.
    Other(String),
}

impl AnalysisState {
    /// Maps the wire value to a state. Unknown values are preserved.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "success" => Self::Success,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A single validated analysis event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisEvent {
    /// Repository the analysis ran against.
    pub slug: RepositorySlug,
    /// Commit the status is attached to.
    pub commit: CommitRef,
    /// Pull request receiving the comment.
    pub number: PullRequestNumber,
    /// Declared lifecycle state.
    pub state: AnalysisState,
    /// Link to the analysis details.
    pub details_url: String,
    /// Link to the comparison view.
    pub compare_url: String,
}

impl AnalysisEvent {
    /// Extracts an event from an untyped payload.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MissingField`] naming the first absent key, or
    /// [`RelayError::InvalidField`] when a value has the wrong type or shape.
    pub fn from_payload(payload: &Value) -> Result<Self, RelayError> {
        let record = payload
            .as_object()
            .ok_or_else(|| RelayError::InvalidField {
                field: "event",
                message: "payload must be a JSON object".to_owned(),
            })?;

        let slug = RepositorySlug::new(require_str(record, "github_slug")?)?;
        let commit = CommitRef::new(require_str(record, "commit_sha")?)?;
        let number = require_number(record)?;
        let state = AnalysisState::parse(require_str(record, "state")?);
        let details_url = require_str(record, "details_url")?.to_owned();
        let compare_url = require_str(record, "compare_url")?.to_owned();

        Ok(Self {
            slug,
            commit,
            number,
            state,
            details_url,
            compare_url,
        })
    }
}

fn require<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, RelayError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(RelayError::MissingField { field }),
        Some(value) => Ok(value),
    }
}

fn require_str<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, RelayError> {
    require(record, field)?
        .as_str()
        .ok_or_else(|| RelayError::InvalidField {
            field,
            message: "expected a string".to_owned(),
        })
}

fn require_number(record: &Map<String, Value>) -> Result<PullRequestNumber, RelayError> {
    let field = "number";
    let invalid = || RelayError::InvalidField {
        field,
        message: "expected a positive integer".to_owned(),
    };
    let raw = match require(record, field)? {
        Value::Number(number) => number.as_u64().ok_or_else(invalid)?,
        Value::String(text) => text.trim().parse::<u64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    PullRequestNumber::new(raw)
}
