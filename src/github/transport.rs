//! Blocking HTTP transport for the GitHub REST API.
//!
//! The relay talks to GitHub through the [`GitHubTransport`] trait so the
//! decision logic can be tested with mocks. [`ReqwestTransport`] is the
//! production implementation: a synchronous client carrying the
//! authentication headers on every request, with a per-request timeout and
//! no retries.

use std::time::Duration;

use http::HeaderMap;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::RelayError;
use super::error_mapping::{map_http_error, map_transport_error};
use super::token::OAuthToken;

/// Product name sent as the `User-Agent` header.
pub const PRODUCT_NAME: &str = "Code Climate";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Successful response returned by a transport.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Returns a header as text when present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Decode` when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RelayError> {
        serde_json::from_str(&self.body).map_err(|error| RelayError::Decode {
            message: error.to_string(),
        })
    }
}

/// Synchronous request/response access to GitHub.
///
/// Implementations return `Err` for every non-2xx response and for every
/// transport failure. They must not retry.
#[cfg_attr(test, mockall::automock)]
pub trait GitHubTransport: Send + Sync {
    /// Issue an authenticated `GET`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Remote`] for non-success statuses and
    /// [`RelayError::Network`] when no response arrives.
    fn get(&self, url: &str) -> Result<ApiResponse, RelayError>;

    /// Issue an authenticated `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Remote`] for non-success statuses and
    /// [`RelayError::Network`] when no response arrives.
    fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, RelayError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport that authenticates every request with `token`.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` when the token cannot be used as a
    /// header value or the client cannot be constructed.
    pub fn for_token(token: &OAuthToken, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .default_headers(default_headers(token)?)
            .timeout(timeout)
            .build()
            .map_err(|error| RelayError::Configuration {
                message: format!("failed to configure GitHub HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }

    fn execute(operation: &str, request: RequestBuilder) -> Result<ApiResponse, RelayError> {
        let response = request
            .send()
            .map_err(|error| map_transport_error(operation, &error))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .map_err(|error| map_transport_error(operation, &error))?;

        if !status.is_success() {
            tracing::debug!("{operation} returned {status}");
            return Err(map_http_error(operation, status, &body));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

impl GitHubTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<ApiResponse, RelayError> {
        tracing::debug!("GET {url}");
        Self::execute(&format!("GET {url}"), self.client.get(url))
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, RelayError> {
        tracing::debug!("POST {url}");
        Self::execute(&format!("POST {url}"), self.client.post(url).json(body))
    }
}

fn default_headers(token: &OAuthToken) -> Result<HeaderMap, RelayError> {
    let mut authorization =
        HeaderValue::from_str(&token.authorization()).map_err(|_| RelayError::Configuration {
            message: "OAuth token contains characters not allowed in a header".to_owned(),
        })?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(USER_AGENT, HeaderValue::from_static(PRODUCT_NAME));
    Ok(headers)
}
