//! Relays analysis events to GitHub statuses and pull request comments.
//!
//! [`PullRequestRelay`] borrows a transport and an immutable
//! [`ServiceConfig`] for one invocation. It exposes two entry points:
//!
//! - [`PullRequestRelay::receive_test`] probes the token without a real event.
//! - [`PullRequestRelay::receive_event`] validates an event payload and
//!   performs the status update and comment post it calls for.
//!
//! Both return a single [`OperationResult`]. Remote failures never escape as
//! errors; only a malformed event does.

mod comment;
mod credentials;
mod status;

use serde_json::Value;

use crate::event::{AnalysisEvent, AnalysisState};
use crate::github::{ApiBase, GitHubTransport, OAuthToken, RelayError, RepositorySlug};
use crate::outcome::{OperationResult, aggregate};

pub use comment::{COMMENT_TEMPLATE, is_analysis_comment, render_comment};
pub use credentials::{REPO_SCOPE, SCOPE_HEADER, TOKEN_VALID_MESSAGE, scopes_include_repo};
pub use status::{PENDING_DESCRIPTION, STATUS_CONTEXT, SUCCESS_DESCRIPTION};

/// Immutable settings for one relay invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Token used to authenticate against GitHub.
    pub token: OAuthToken,
    /// Whether commit statuses are updated.
    pub update_status: bool,
    /// Whether a pull request comment is posted.
    pub add_comment: bool,
    /// REST API root.
    pub api_base: ApiBase,
}

impl ServiceConfig {
    /// Configuration against the public GitHub API.
    #[must_use]
    pub fn new(token: OAuthToken, update_status: bool, add_comment: bool) -> Self {
        Self {
            token,
            update_status,
            add_comment,
            api_base: ApiBase::default(),
        }
    }

    /// Replaces the API root.
    #[must_use]
    pub fn with_api_base(mut self, api_base: ApiBase) -> Self {
        self.api_base = api_base;
        self
    }
}

/// Decision logic for one invocation.
pub struct PullRequestRelay<'client, Transport>
where
    Transport: GitHubTransport,
{
    transport: &'client Transport,
    config: &'client ServiceConfig,
}

impl<'client, Transport> PullRequestRelay<'client, Transport>
where
    Transport: GitHubTransport,
{
    /// Create a relay over the provided transport and configuration.
    #[must_use]
    pub const fn new(transport: &'client Transport, config: &'client ServiceConfig) -> Self {
        Self { transport, config }
    }

    /// Checks that the token can do what the enabled toggles need on `slug`.
    ///
    /// With both toggles on, the status and scope probes are aggregated.
    /// With one on, only its probe runs. With neither, nothing is sent.
    #[must_use]
    pub fn receive_test(&self, slug: &RepositorySlug) -> OperationResult {
        match (self.config.update_status, self.config.add_comment) {
            (true, true) => aggregate(
                self.probe_status_access(slug),
                self.probe_comment_scope(),
            ),
            (true, false) => self.probe_status_access(slug),
            (false, true) => self.probe_comment_scope(),
            (false, false) => OperationResult::skipped("no actions are enabled"),
        }
    }

    /// Validates the payload and handles the event it describes.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MissingField`] or [`RelayError::InvalidField`]
    /// when the payload is malformed. No remote call is made in that case.
    pub fn receive_event(&self, payload: &Value) -> Result<OperationResult, RelayError> {
        let event = AnalysisEvent::from_payload(payload)?;
        Ok(self.handle_event(&event))
    }

    /// Dispatches on the event state.
    ///
    /// `pending` updates the status, `success` posts the comment and then
    /// updates the status, and every other state is ignored.
    #[must_use]
    pub fn handle_event(&self, event: &AnalysisEvent) -> OperationResult {
        match &event.state {
            AnalysisState::Pending => self.update_status(event, "pending", PENDING_DESCRIPTION),
            AnalysisState::Success => {
                let comment = self.add_comment(event);
                let status = self.update_status(event, "success", SUCCESS_DESCRIPTION);
                aggregate(status, comment)
            }
            AnalysisState::Other(state) => {
                tracing::debug!("ignoring {} event in state `{state}`", event.slug);
                OperationResult::skipped(format!("state `{state}` requires no action"))
            }
        }
    }
}
