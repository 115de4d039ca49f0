//! One-time analysis comment on the pull request.
//!
//! The comment text doubles as the idempotence key: before posting, the
//! existing comments are scanned for the signature that [`render_comment`]
//! produces. Writer and matcher must stay in sync.

use std::sync::LazyLock;

use regex::Regex;

use crate::event::AnalysisEvent;
use crate::github::{CommentPayload, GitHubTransport, IssueComment, RelayError, comments_url};
use crate::outcome::OperationResult;

use super::PullRequestRelay;

/// Comment body; `{compare_url}` is replaced with the comparison link.
pub const COMMENT_TEMPLATE: &str = concat!(
    r#"<img src="https://codeclimate.com/favicon.png" width="20" height="20" />"#,
    r#"&nbsp;<b>Code Climate</b> has <a href="{compare_url}">analyzed this pull request</a>."#
);

#[expect(
    clippy::expect_used,
    reason = "the signature pattern is a literal covered by tests"
)]
static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<b>Code Climate</b> has <a href=".*">analyzed this pull request</a>"#)
        .expect("signature pattern should compile")
});

/// Renders the comment for a comparison link.
#[must_use]
pub fn render_comment(compare_url: &str) -> String {
    COMMENT_TEMPLATE.replace("{compare_url}", compare_url)
}

/// Whether a comment body was written by the relay.
#[must_use]
pub fn is_analysis_comment(body: &str) -> bool {
    SIGNATURE.is_match(body)
}

impl<Transport> PullRequestRelay<'_, Transport>
where
    Transport: GitHubTransport,
{
    /// Posts the analysis comment unless one is already present.
    ///
    /// Skipped when comments are disabled or when a previous delivery of the
    /// same event already left the comment.
    #[must_use]
    pub fn add_comment(&self, event: &AnalysisEvent) -> OperationResult {
        if !self.config.add_comment {
            tracing::debug!("comments disabled; not commenting on {}", event.slug);
            return OperationResult::skipped("pull request comments are disabled");
        }

        let url = comments_url(&self.config.api_base, &event.slug, event.number);
        match self.comment_present(&url) {
            Ok(true) => {
                tracing::debug!(
                    "{}#{} already carries the analysis comment",
                    event.slug,
                    event.number.get()
                );
                return OperationResult::skipped("analysis comment already present");
            }
            Ok(false) => {}
            Err(error) => {
                tracing::warn!("listing comments on {} failed: {error}", event.slug);
                return error.into();
            }
        }

        let body = render_comment(&event.compare_url);
        let payload = match serde_json::to_value(CommentPayload { body: &body }) {
            Ok(payload) => payload,
            Err(error) => return OperationResult::failure(error.to_string()),
        };

        match self.transport.post_json(&url, &payload) {
            Ok(_) => {
                tracing::info!("commented on {}#{}", event.slug, event.number.get());
                OperationResult::success("analysis comment posted")
            }
            Err(error) => {
                tracing::warn!("posting comment on {} failed: {error}", event.slug);
                error.into()
            }
        }
    }

    fn comment_present(&self, url: &str) -> Result<bool, RelayError> {
        let comments: Vec<IssueComment> = self.transport.get(url)?.json()?;
        Ok(comments
            .iter()
            .filter_map(|comment| comment.body.as_deref())
            .any(is_analysis_comment))
    }
}
