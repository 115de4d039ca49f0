//! Wire models for the GitHub endpoints the relay uses.

use serde::{Deserialize, Serialize};

/// Body of `POST /repos/{slug}/statuses/{ref}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPayload<'a> {
    /// Status state such as `pending` or `success`.
    pub state: &'a str,
    /// Short human-readable description.
    pub description: &'a str,
    /// Link shown next to the status.
    pub target_url: &'a str,
    /// Status context the state is recorded under.
    pub context: &'a str,
}

/// Body of `POST /repos/{slug}/issues/{number}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentPayload<'a> {
    /// Markdown or HTML comment text.
    pub body: &'a str,
}

/// Issue comment as returned by the list endpoint. Only the body matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    /// Comment text, absent for some bot comments.
    #[serde(default)]
    pub body: Option<String>,
}
