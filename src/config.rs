//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pr-relay.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PR_RELAY_OAUTH_TOKEN` and friends, or
//!    legacy `GITHUB_TOKEN` for the token
//! 4. **Command-line arguments** – `--oauth-token`/`-t`, `--event`/`-e`, ...
//!
//! # Configuration File
//!
//! ```toml
//! oauth_token = "ghp_example"
//! update_status = true
//! add_comment = true
//! api_base = "https://api.github.com"
//! timeout_secs = 10
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::{ApiBase, DEFAULT_TIMEOUT, OAuthToken, RelayError, RepositorySlug};
use crate::relay::ServiceConfig;

/// What the binary should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Probe the token without an event.
    ConnectionTest,
    /// Relay one analysis event.
    RelayEvent,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PR_RELAY_OAUTH_TOKEN`, `GITHUB_TOKEN`, or `--oauth-token`: OAuth token
/// - `PR_RELAY_UPDATE_STATUS` or `--update-status`: update commit statuses
/// - `PR_RELAY_ADD_COMMENT` or `--add-comment`: comment on pull requests
/// - `PR_RELAY_API_BASE` or `--api-base`: REST API root
/// - `PR_RELAY_EVENT` or `--event`: event document path (`-` for stdin)
/// - `PR_RELAY_REPOSITORY` or `--repository`: slug probed by the connection test
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PR_RELAY",
    discovery(
        dotfile_name = ".pr-relay.toml",
        config_file_name = "pr-relay.toml",
        app_name = "pr-relay"
    )
)]
pub struct RelayConfig {
    /// OAuth token whose owner authors the comment.
    #[ortho_config(cli_short = 't')]
    pub oauth_token: Option<String>,

    /// Update the commit status after analysing.
    pub update_status: bool,

    /// Comment on the pull request after analysing.
    pub add_comment: bool,

    /// REST API root; defaults to `https://api.github.com`.
    pub api_base: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Path of the analysis event JSON document, or `-` for stdin.
    #[ortho_config(cli_short = 'e')]
    pub event: Option<String>,

    /// Repository (`owner/name`) used by the connection test.
    #[ortho_config(cli_short = 'r')]
    pub repository: Option<String>,

    /// Probe the token instead of relaying an event.
    pub test_connection: bool,
}

impl RelayConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<OAuthToken, RelayError> {
        let raw = self
            .oauth_token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(RelayError::MissingToken)?;
        OAuthToken::new(raw)
    }

    /// Parses the configured API root, falling back to the public API.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidUrl`] when the value cannot be parsed.
    pub fn resolve_api_base(&self) -> Result<ApiBase, RelayError> {
        self.api_base
            .as_deref()
            .map_or_else(|| Ok(ApiBase::default()), ApiBase::parse)
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Validated settings for the relay.
    ///
    /// # Errors
    ///
    /// Propagates token and API base validation failures.
    pub fn service_config(&self) -> Result<ServiceConfig, RelayError> {
        Ok(
            ServiceConfig::new(self.resolve_token()?, self.update_status, self.add_comment)
                .with_api_base(self.resolve_api_base()?),
        )
    }

    /// Determines the operation mode.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.test_connection {
            OperationMode::ConnectionTest
        } else {
            OperationMode::RelayEvent
        }
    }

    /// Returns the event source or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] when no event is configured.
    pub fn require_event(&self) -> Result<&str, RelayError> {
        self.event
            .as_deref()
            .ok_or_else(|| RelayError::Configuration {
                message: "an event document is required (use --event or -e)".to_owned(),
            })
    }

    /// Returns the repository probed by the connection test.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] when absent, or
    /// [`RelayError::InvalidField`] when it is not `owner/name`.
    pub fn require_repository(&self) -> Result<RepositorySlug, RelayError> {
        let raw = self
            .repository
            .as_deref()
            .ok_or_else(|| RelayError::Configuration {
                message: "a repository is required to test the connection (use --repository or -r)"
                    .to_owned(),
            })?;
        RepositorySlug::new(raw)
    }
}
