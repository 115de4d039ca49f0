//! Wiremock GitHub server driven from synchronous tests.

use std::io;

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// Mock GitHub API with the Tokio runtime that serves it.
///
/// The blocking transport must not run inside the runtime, so tests call it
/// directly and only use the runtime to drive the server.
pub struct MockGitHub {
    server: MockServer,
    runtime: Runtime,
}

impl MockGitHub {
    /// Starts a server on a fresh multi-threaded runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tokio runtime cannot be created.
    pub fn start() -> Result<Self, io::Error> {
        let runtime = Runtime::new()?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self { server, runtime })
    }

    /// Base URL to use as the API root.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mounts a mock on the server.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Requests received so far.
    pub fn received(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// Requests received so far with the given method and path.
    pub fn received_matching(&self, method: &str, path: &str) -> Vec<Request> {
        self.received()
            .into_iter()
            .filter(|request| request.method.as_str() == method && request.url.path() == path)
            .collect()
    }
}
