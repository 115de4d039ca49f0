//! Commit status updates.

use crate::event::AnalysisEvent;
use crate::github::{GitHubTransport, StatusPayload, status_url};
use crate::outcome::OperationResult;

use super::PullRequestRelay;

/// Context the status is recorded under.
pub const STATUS_CONTEXT: &str = "codeclimate";

/// Description sent with the `pending` status.
pub const PENDING_DESCRIPTION: &str = "Code Climate is analyzing this code.";

/// Description sent with the `success` status.
pub const SUCCESS_DESCRIPTION: &str = "Code Climate has analyzed this pull request.";

impl<Transport> PullRequestRelay<'_, Transport>
where
    Transport: GitHubTransport,
{
    /// Posts a status for the event's commit.
    ///
    /// Skipped when status updates are disabled. There is no local guard
    /// against repeats; GitHub keeps the latest state per context.
    #[must_use]
    pub fn update_status(
        &self,
        event: &AnalysisEvent,
        state: &str,
        description: &str,
    ) -> OperationResult {
        if !self.config.update_status {
            tracing::debug!("status updates disabled; not marking {} {state}", event.slug);
            return OperationResult::skipped("status updates are disabled");
        }

        let payload = StatusPayload {
            state,
            description,
            target_url: &event.details_url,
            context: STATUS_CONTEXT,
        };
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(error) => return OperationResult::failure(error.to_string()),
        };
        let url = status_url(&self.config.api_base, &event.slug, &event.commit);

        match self.transport.post_json(&url, &body) {
            Ok(response) => {
                tracing::info!(
                    "marked {}@{} {state} ({})",
                    event.slug,
                    event.commit.as_str(),
                    response.status
                );
                OperationResult::success(format!("status set to {state}"))
            }
            Err(error) => {
                tracing::warn!("status update for {} failed: {error}", event.slug);
                error.into()
            }
        }
    }
}
