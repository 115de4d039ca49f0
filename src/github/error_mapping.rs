//! Error mapping helpers for the GitHub transport.

use http::StatusCode;

use super::error::RelayError;

const MAX_DETAIL_CHARS: usize = 160;

/// Builds the error for a non-success response.
///
/// GitHub's JSON `message` field is preferred; otherwise a truncated copy of
/// the raw body is used so the remote detail still reaches the caller.
pub(super) fn map_http_error(operation: &str, status: StatusCode, body: &str) -> RelayError {
    let detail = extract_github_message(body)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| truncate_for_message(trimmed, MAX_DETAIL_CHARS))
        })
        .unwrap_or_else(|| "unknown error".to_owned());

    RelayError::Remote {
        status: status.as_u16(),
        message: format!("{operation} failed with status {status}: {detail}"),
    }
}

pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> RelayError {
    RelayError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output: String = message.chars().take(max_chars).collect();
    if message.chars().nth(max_chars).is_some() {
        output.push_str("...");
    }
    output
}
