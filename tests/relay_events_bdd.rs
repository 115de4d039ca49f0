//! Behavioural tests for event dispatch and comment de-duplication.

use std::sync::{Arc, Mutex};

use pr_relay::github::ApiResponse;
use pr_relay::relay::is_analysis_comment;
use pr_relay::{
    ApiBase, GitHubTransport, OAuthToken, OperationResult, PullRequestRelay, RelayError,
    ServiceConfig,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};

const COMMENTS_URL: &str = "https://github.test/repos/octo/repo/issues/5/comments";
const STATUS_URL: &str = "https://github.test/repos/octo/repo/statuses/abc123";

/// GitHub double that remembers comments across deliveries.
#[derive(Default)]
struct RecordingGitHub {
    comments: Mutex<Vec<String>>,
    statuses: Mutex<usize>,
    requests: Mutex<usize>,
}

impl RecordingGitHub {
    fn record_request(&self) {
        if let Ok(mut requests) = self.requests.lock() {
            *requests += 1;
        }
    }

    fn requests(&self) -> usize {
        self.requests.lock().map(|count| *count).unwrap_or_default()
    }

    fn statuses(&self) -> usize {
        self.statuses.lock().map(|count| *count).unwrap_or_default()
    }

    fn analysis_comments(&self) -> usize {
        self.comments
            .lock()
            .map(|comments| comments.iter().filter(|body| is_analysis_comment(body)).count())
            .unwrap_or_default()
    }
}

impl GitHubTransport for RecordingGitHub {
    fn get(&self, url: &str) -> Result<ApiResponse, RelayError> {
        self.record_request();
        if url != COMMENTS_URL {
            return Err(RelayError::Remote {
                status: 404,
                message: "Not Found".to_owned(),
            });
        }
        let listed: Vec<Value> = self
            .comments
            .lock()
            .map(|comments| comments.iter().map(|body| json!({ "body": body })).collect())
            .unwrap_or_default();
        Ok(ApiResponse {
            status: 200,
            body: Value::Array(listed).to_string(),
            ..ApiResponse::default()
        })
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, RelayError> {
        self.record_request();
        if url == COMMENTS_URL {
            let text = body
                .get("body")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            if let Ok(mut comments) = self.comments.lock() {
                comments.push(text);
            }
        } else if url == STATUS_URL {
            if let Ok(mut statuses) = self.statuses.lock() {
                *statuses += 1;
            }
        } else {
            return Err(RelayError::Remote {
                status: 404,
                message: "Not Found".to_owned(),
            });
        }
        Ok(ApiResponse {
            status: 201,
            body: "{}".to_owned(),
            ..ApiResponse::default()
        })
    }
}

#[derive(ScenarioState, Default)]
struct RelayState {
    github: Slot<Arc<RecordingGitHub>>,
    config: Slot<ServiceConfig>,
    outcomes: Slot<Vec<OperationResult>>,
    error: Slot<RelayError>,
}

#[fixture]
fn relay_state() -> RelayState {
    RelayState::default()
}

fn event(state: &str) -> Value {
    json!({
        "github_slug": "octo/repo",
        "commit_sha": "abc123",
        "number": 5,
        "state": state,
        "details_url": "https://codeclimate.com/details/5",
        "compare_url": "https://codeclimate.com/compare/5"
    })
}

fn github(relay_state: &RelayState) -> Arc<RecordingGitHub> {
    relay_state
        .github
        .get()
        .unwrap_or_else(|| panic!("GitHub double not initialised"))
}

fn deliver(relay_state: &RelayState, payload: &Value) {
    let config = relay_state
        .config
        .get()
        .unwrap_or_else(|| panic!("configuration not initialised"));
    let double = github(relay_state);
    let relay = PullRequestRelay::new(double.as_ref(), &config);

    match relay.receive_event(payload) {
        Ok(outcome) => {
            let mut outcomes = relay_state.outcomes.take().unwrap_or_default();
            outcomes.push(outcome);
            relay_state.outcomes.set(outcomes);
        }
        Err(error) => relay_state.error.set(error),
    }
}

fn configure(relay_state: &RelayState, enabled: bool) {
    let token = OAuthToken::new("test-token").unwrap_or_else(|error| panic!("{error}"));
    let base =
        ApiBase::parse("https://github.test").unwrap_or_else(|error| panic!("{error}"));
    relay_state
        .config
        .set(ServiceConfig::new(token, enabled, enabled).with_api_base(base));
    relay_state.github.set(Arc::new(RecordingGitHub::default()));
}

// --- Given steps ---

#[given("a pull request with status updates and comments enabled")]
fn toggles_enabled(relay_state: &RelayState) {
    configure(relay_state, true);
}

#[given("a pull request with status updates and comments disabled")]
fn toggles_disabled(relay_state: &RelayState) {
    configure(relay_state, false);
}

// --- When steps ---

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the {state} event is delivered {times:u64} times")]
fn deliver_event(relay_state: &RelayState, state: String, times: u64) {
    let payload = event(state.trim_matches('"'));
    for _ in 0..times {
        deliver(relay_state, &payload);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("an event without {field} is delivered")]
fn deliver_incomplete_event(relay_state: &RelayState, field: String) {
    let mut payload = event("success");
    if let Some(record) = payload.as_object_mut() {
        record.remove(field.trim_matches('"'));
    }
    deliver(relay_state, &payload);
}

// --- Then steps ---

#[then("the pull request has {count:u64} analysis comments")]
fn assert_comment_count(relay_state: &RelayState, count: u64) {
    let actual = github(relay_state).analysis_comments() as u64;
    assert_eq!(actual, count, "analysis comment count mismatch");
}

#[then("{count:u64} statuses were recorded")]
fn assert_status_count(relay_state: &RelayState, count: u64) {
    let actual = github(relay_state).statuses() as u64;
    assert_eq!(actual, count, "status count mismatch");
}

#[then("every delivery succeeded")]
fn assert_all_succeeded(relay_state: &RelayState) {
    let outcomes = relay_state.outcomes.get().unwrap_or_default();
    assert!(!outcomes.is_empty(), "no delivery completed");
    for outcome in outcomes {
        assert!(outcome.ok, "delivery failed: {outcome}");
    }
}

#[then("no request reached GitHub")]
fn assert_no_requests(relay_state: &RelayState) {
    assert_eq!(github(relay_state).requests(), 0, "unexpected GitHub traffic");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the event is rejected for missing {field}")]
fn assert_missing_field(relay_state: &RelayState, field: String) {
    let error = relay_state
        .error
        .get()
        .unwrap_or_else(|| panic!("expected the event to be rejected"));
    let expected = field.trim_matches('"');
    assert!(
        matches!(error, RelayError::MissingField { field: missing } if missing == expected),
        "expected MissingField for {expected}, got {error:?}"
    );
}

#[scenario(path = "tests/features/relay_events.feature", index = 0)]
fn redelivered_success_event(relay_state: RelayState) {
    let _ = relay_state;
}

#[scenario(path = "tests/features/relay_events.feature", index = 1)]
fn pending_event_updates_status(relay_state: RelayState) {
    let _ = relay_state;
}

#[scenario(path = "tests/features/relay_events.feature", index = 2)]
fn unknown_state_is_ignored(relay_state: RelayState) {
    let _ = relay_state;
}

#[scenario(path = "tests/features/relay_events.feature", index = 3)]
fn disabled_toggles_are_no_ops(relay_state: RelayState) {
    let _ = relay_state;
}

#[scenario(path = "tests/features/relay_events.feature", index = 4)]
fn incomplete_event_is_rejected(relay_state: RelayState) {
    let _ = relay_state;
}
