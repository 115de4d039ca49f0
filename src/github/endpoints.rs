//! Identity wrappers and REST endpoint resolution.
//!
//! Every URL the relay calls is derived here from an [`ApiBase`] and the
//! validated identifiers taken from the analysis event. The functions are
//! pure so they can be exercised without a network.

use std::fmt;

use url::Url;

use super::error::RelayError;

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const SENTINEL_COMMIT_LENGTH: usize = 40;

/// Validated REST API base URL, stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    /// Parses an API base such as `https://ghe.example.com/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidUrl` when the input is not an absolute
    /// `http` or `https` URL.
    pub fn parse(input: &str) -> Result<Self, RelayError> {
        let parsed =
            Url::parse(input.trim()).map_err(|error| RelayError::InvalidUrl(error.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RelayError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                parsed.scheme()
            )));
        }
        Ok(Self(parsed.as_str().trim_end_matches('/').to_owned()))
    }

    /// Base URL ready for path concatenation.
    #[must_use]
    pub const fn as_prefix(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self(DEFAULT_API_BASE.to_owned())
    }
}

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug(String);

impl RepositorySlug {
    /// Validates an `owner/name` slug.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidField` when either half is empty or the
    /// value contains more than one `/`.
    pub fn new(value: &str) -> Result<Self, RelayError> {
        let trimmed = value.trim();
        let valid = trimmed.split_once('/').is_some_and(|(owner, name)| {
            !owner.is_empty() && !name.is_empty() && !name.contains('/')
        });
        if !valid {
            return Err(RelayError::InvalidField {
                field: "github_slug",
                message: format!("expected `owner/name`, got `{trimmed}`"),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the slug.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Commit reference a status is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef(String);

impl CommitRef {
    /// Validates a commit reference.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidField` when the value is blank or contains
    /// whitespace or `/`.
    pub fn new(value: &str) -> Result<Self, RelayError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(RelayError::InvalidField {
                field: "commit_sha",
                message: format!("`{trimmed}` is not a commit reference"),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Commit that cannot exist; used to probe status permissions.
    #[must_use]
    pub fn sentinel() -> Self {
        Self("0".repeat(SENTINEL_COMMIT_LENGTH))
    }

    /// Borrow the reference.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Wraps a positive pull request number.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidField` for zero.
    pub fn new(value: u64) -> Result<Self, RelayError> {
        if value == 0 {
            return Err(RelayError::InvalidField {
                field: "number",
                message: "pull request number must be positive".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// `POST` target for commit statuses.
#[must_use]
pub fn status_url(base: &ApiBase, slug: &RepositorySlug, commit: &CommitRef) -> String {
    format!(
        "{}/repos/{}/statuses/{}",
        base.as_prefix(),
        slug.as_str(),
        commit.as_str()
    )
}

/// Issue comments collection of a pull request.
#[must_use]
pub fn comments_url(base: &ApiBase, slug: &RepositorySlug, number: PullRequestNumber) -> String {
    format!(
        "{}/repos/{}/issues/{}/comments",
        base.as_prefix(),
        slug.as_str(),
        number.get()
    )
}

/// Identity of the token owner.
#[must_use]
pub fn user_url(base: &ApiBase) -> String {
    format!("{}/user", base.as_prefix())
}
