//! `pr-relay` entrypoint: relays one analysis event or tests a token.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use pr_relay::{
    OperationMode, OperationResult, PullRequestRelay, RelayConfig, RelayError, ReqwestTransport,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "pr_relay=info";

/// Exit status for a failed relay or an unusable environment.
const FAILURE_EXIT: u8 = 1;

/// Exit status for an event document the relay refused to act on.
const PAYLOAD_EXIT: u8 = 2;

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(outcome) => {
            let printed = writeln!(io::stdout().lock(), "{outcome}").is_ok();
            if outcome.ok && printed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::from(exit_status(&error))
        }
    }
}

const fn exit_status(error: &RelayError) -> u8 {
    if error.is_payload_error() {
        PAYLOAD_EXIT
    } else {
        FAILURE_EXIT
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<OperationResult, RelayError> {
    let config = load_config()?;
    let service = config.service_config()?;
    let transport = ReqwestTransport::for_token(&service.token, config.timeout())?;
    let relay = PullRequestRelay::new(&transport, &service);

    match config.operation_mode() {
        OperationMode::ConnectionTest => {
            let slug = config.require_repository()?;
            tracing::info!("testing GitHub access for {slug}");
            Ok(relay.receive_test(&slug))
        }
        OperationMode::RelayEvent => {
            let payload = read_event(config.require_event()?)?;
            relay.receive_event(&payload)
        }
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`RelayError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RelayConfig, RelayError> {
    RelayConfig::load().map_err(|error| RelayError::Configuration {
        message: error.to_string(),
    })
}

fn read_event(source: &str) -> Result<serde_json::Value, RelayError> {
    let text = if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|error| RelayError::Io {
                message: format!("failed to read event from stdin: {error}"),
            })?;
        buffer
    } else {
        fs::read_to_string(source).map_err(|error| RelayError::Io {
            message: format!("failed to read event file {source}: {error}"),
        })?
    };

    serde_json::from_str(&text).map_err(|error| RelayError::InvalidField {
        field: "event",
        message: format!("event is not valid JSON: {error}"),
    })
}

#[cfg(test)]
mod tests {
    use pr_relay::RelayError;
    use rstest::rstest;

    use super::{FAILURE_EXIT, PAYLOAD_EXIT, exit_status};

    #[rstest]
    #[case::missing_field(RelayError::MissingField { field: "commit_sha" }, PAYLOAD_EXIT)]
    #[case::unparseable_event(
        RelayError::InvalidField {
            field: "event",
            message: "event is not valid JSON".to_owned(),
        },
        PAYLOAD_EXIT
    )]
    #[case::missing_token(RelayError::MissingToken, FAILURE_EXIT)]
    #[case::unreadable_file(
        RelayError::Io {
            message: "no such file".to_owned(),
        },
        FAILURE_EXIT
    )]
    fn payload_errors_exit_distinctly(#[case] error: RelayError, #[case] expected: u8) {
        assert_eq!(exit_status(&error), expected, "{error}");
    }
}
