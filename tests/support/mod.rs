//! Shared test utilities.

pub mod runtime;

use pr_relay::{OAuthToken, ReqwestTransport, ServiceConfig};
use serde_json::{Value, json};

/// Token every mock server expects.
pub const TOKEN: &str = "test-token";

/// Builds a transport authenticated with [`TOKEN`].
///
/// # Panics
///
/// Panics if the token or client cannot be constructed.
pub fn transport() -> ReqwestTransport {
    let token = OAuthToken::new(TOKEN).unwrap_or_else(|error| panic!("token rejected: {error}"));
    ReqwestTransport::for_token(&token, std::time::Duration::from_secs(5))
        .unwrap_or_else(|error| panic!("failed to build transport: {error}"))
}

/// Relay settings pointed at `api_base`.
///
/// # Panics
///
/// Panics if the base URL is rejected.
pub fn service_config(api_base: &str, update_status: bool, add_comment: bool) -> ServiceConfig {
    let token = OAuthToken::new(TOKEN).unwrap_or_else(|error| panic!("token rejected: {error}"));
    let base = pr_relay::ApiBase::parse(api_base)
        .unwrap_or_else(|error| panic!("API base rejected: {error}"));
    ServiceConfig::new(token, update_status, add_comment).with_api_base(base)
}

/// Analysis event for `octo/repo#5` at commit `abc123`.
pub fn event(state: &str) -> Value {
    json!({
        "github_slug": "octo/repo",
        "commit_sha": "abc123",
        "number": 5,
        "state": state,
        "details_url": "https://codeclimate.com/details/5",
        "compare_url": "https://codeclimate.com/compare/5"
    })
}
