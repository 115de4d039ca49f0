//! Non-destructive token probes used by the connectivity test.
//!
//! Neither probe needs a real event. The status probe writes to a commit
//! that cannot exist, and the comment probe only reads the token owner's
//! identity.

use http::StatusCode;
use serde_json::json;

use crate::github::{CommitRef, GitHubTransport, RelayError, RepositorySlug, status_url, user_url};
use crate::outcome::OperationResult;

use super::PullRequestRelay;

/// Message reported when a probe confirms the token.
pub const TOKEN_VALID_MESSAGE: &str = "OAuth token is valid";

/// Scope needed to comment on private and public repositories.
pub const REPO_SCOPE: &str = "repo";

/// Response header listing the token's scopes.
pub const SCOPE_HEADER: &str = "X-OAuth-Scopes";

const MISSING_SCOPE_MESSAGE: &str = "OAuth token requires 'repo' scope to post comments.";

/// A status write to a missing commit was rejected only because the commit
/// does not exist.
///
/// GitHub answers `422 Unprocessable Entity` ("No commit found for SHA")
/// after authentication and authorisation have passed, so this response
/// proves the token may write statuses.
fn commit_not_found_proves_access(error: &RelayError) -> bool {
    matches!(
        error.remote_status(),
        Some(status) if status == StatusCode::UNPROCESSABLE_ENTITY.as_u16()
    )
}

/// Whether a scope header grants the `repo` scope.
#[must_use]
pub fn scopes_include_repo(header: Option<&str>) -> bool {
    header.is_some_and(|scopes| {
        scopes
            .split(',')
            .map(str::trim)
            .any(|scope| scope == REPO_SCOPE)
    })
}

impl<Transport> PullRequestRelay<'_, Transport>
where
    Transport: GitHubTransport,
{
    /// Verifies the token may write commit statuses on `slug`.
    #[must_use]
    pub fn probe_status_access(&self, slug: &RepositorySlug) -> OperationResult {
        let url = status_url(&self.config.api_base, slug, &CommitRef::sentinel());
        match self.transport.post_json(&url, &json!({})) {
            Ok(response) => {
                tracing::debug!(
                    "status probe answered {}; token accepted",
                    response.status
                );
                OperationResult::success(TOKEN_VALID_MESSAGE)
            }
            Err(error) if commit_not_found_proves_access(&error) => {
                tracing::debug!("status probe reached commit lookup; token accepted");
                OperationResult::success(TOKEN_VALID_MESSAGE)
            }
            Err(error) => {
                tracing::warn!("status probe failed: {error}");
                error.into()
            }
        }
    }

    /// Verifies the token carries the `repo` scope.
    #[must_use]
    pub fn probe_comment_scope(&self) -> OperationResult {
        let response = match self.transport.get(&user_url(&self.config.api_base)) {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!("scope probe failed: {error}");
                return error.into();
            }
        };

        if scopes_include_repo(response.header(SCOPE_HEADER)) {
            OperationResult::success(TOKEN_VALID_MESSAGE)
        } else {
            tracing::warn!(
                "token scopes {:?} lack `{REPO_SCOPE}`",
                response.header(SCOPE_HEADER)
            );
            OperationResult::failure(MISSING_SCOPE_MESSAGE)
        }
    }
}
