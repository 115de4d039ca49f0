//! Relays code analysis results to GitHub pull requests.
//!
//! The library validates analysis events, updates the commit status for the
//! analysed commit, posts a single annotation comment on the pull request,
//! and probes OAuth tokens for the access those actions need. Every remote
//! operation reports an [`OperationResult`]; two results are merged with
//! [`aggregate`] into the verdict shown to the user.

pub mod config;
pub mod event;
pub mod github;
pub mod outcome;
pub mod relay;

pub use config::{OperationMode, RelayConfig};
pub use event::{AnalysisEvent, AnalysisState};
pub use github::{ApiBase, GitHubTransport, OAuthToken, RelayError, ReqwestTransport};
pub use outcome::{OperationResult, aggregate};
pub use relay::{PullRequestRelay, ServiceConfig};
