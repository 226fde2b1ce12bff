// Error types for SafeComms API calls.
//
// Only a received HTTP error response becomes a `ClientError`. Transport
// failures and local file reads keep their original error values in their
// own variants so callers can still tell the origins apart.

use std::path::PathBuf;

use crate::types::ProblemDetails;

pub type Result<T> = std::result::Result<T, Error>;

/// An error response returned by the SafeComms API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    /// `detail` from the problem body, else `title`, else the HTTP status text.
    pub message: String,
    pub status: Option<u16>,
    /// The error body as received, when the server sent JSON.
    pub problem: Option<ProblemDetails>,
}

impl ClientError {
    pub fn new(
        message: impl Into<String>,
        status: Option<u16>,
        problem: Option<ProblemDetails>,
    ) -> Self {
        Self {
            message: message.into(),
            status,
            problem,
        }
    }

    /// Build from a non-success response's status and problem body.
    ///
    /// The message is the first non-empty string of `detail` and `title`;
    /// `fallback` is used when neither qualifies.
    pub fn from_problem(status: u16, problem: Option<ProblemDetails>, fallback: String) -> Self {
        let message = problem
            .as_ref()
            .and_then(|p| {
                let non_empty = |m: &&str| !m.is_empty();
                p.detail()
                    .filter(non_empty)
                    .or_else(|| p.title().filter(non_empty))
            })
            .map(str::to_string)
            .unwrap_or(fallback);
        Self::new(message, Some(status), problem)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
    }
}

/// Every way a SafeComms call can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ClientError),

    /// The request never produced a response (DNS, connect, TLS, invalid header).
    #[error(transparent)]
    Transport(reqwest::Error),

    /// A success response whose body did not decode.
    #[error("failed to decode SafeComms response: {0}")]
    Decode(reqwest::Error),

    /// Reading a local image file failed.
    #[error("failed to read image file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The API error, if this failure came from an HTTP error response.
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => err.status,
            Error::Decode(err) => err.status().map(|s| s.as_u16()),
            Error::Transport(_) | Error::Io { .. } => None,
        }
    }
}
