//! Blocking HTTP seam used by the remote source.

use std::time::Duration;
use thiserror::Error;

/// A completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code.
    pub status: u16,
    /// Reason phrase (`Not Found`, ...).
    pub status_text: String,
    /// Response body as text.
    pub body: String,
}

impl Response {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS or TLS failure.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport message.
        message: String,
    },
    /// The body could not be read as text.
    #[error("reading body from {url} failed: {source}")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Issues GET requests.
///
/// Non-2xx statuses are returned as a [`Response`]; only failures that
/// produce no response at all are errors.
pub trait Transport: Send + Sync {
    /// Performs a GET with the given headers.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, TransportError>;
}

/// [`Transport`] backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Creates a transport with the given overall request timeout.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("quire/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, TransportError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.set(name, value);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(TransportError::Network {
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }
        };

        let status = response.status();
        let status_text = response.status_text().to_string();
        let body = response
            .into_string()
            .map_err(|source| TransportError::Body {
                url: url.to_string(),
                source,
            })?;
        Ok(Response {
            status,
            status_text,
            body,
        })
    }
}
