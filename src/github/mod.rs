//! GitHub REST plumbing used by the relay.
//!
//! This module owns the error type, the OAuth token wrapper, endpoint
//! resolution, wire models, and the blocking HTTP transport. Failures are
//! mapped into [`RelayError`] variants so callers can report precise causes
//! without exposing `reqwest` internals.

pub mod endpoints;
pub mod error;
mod error_mapping;
pub mod models;
pub mod token;
pub mod transport;

pub use endpoints::{
    ApiBase, CommitRef, DEFAULT_API_BASE, PullRequestNumber, RepositorySlug, comments_url,
    status_url, user_url,
};
pub use error::RelayError;
pub use models::{CommentPayload, IssueComment, StatusPayload};
pub use token::OAuthToken;
pub use transport::{
    ApiResponse, DEFAULT_TIMEOUT, GitHubTransport, PRODUCT_NAME, ReqwestTransport,
};

#[cfg(test)]
pub use transport::MockGitHubTransport;
