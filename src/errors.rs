use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;

/// Cheap to clone so a failed token refresh can be handed to every caller
/// that was waiting on it.
#[derive(Debug, Clone)]
pub enum Error {
    Io(Arc<std::io::Error>),
    /// The HTTP call could not complete.
    Transport(Arc<reqwest::Error>),
    /// The API answered with a non-success status.
    Api { status: StatusCode, message: String },
    /// The token endpoint rejected the credentials.
    Auth { status: StatusCode, message: String },
    /// A body that should have been JSON did not decode.
    Decode(Arc<serde_json::Error>),
    Config(String),
    InvalidHeader(String),
}

impl Error {
    /// HTTP status reported by the API, if the failure came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } | Error::Auth { status, .. } => Some(*status),
            Error::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Message extracted from the API error envelope or the status reason phrase.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } | Error::Auth { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth { .. })
    }

    pub(crate) fn into_auth(self) -> Self {
        match self {
            Error::Api { status, message } => Error::Auth { status, message },
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Transport(err) => write!(f, "transport error: {err}"),
            Error::Api { message, .. } => f.write_str(message),
            Error::Auth { message, .. } => f.write_str(message),
            Error::Decode(err) => write!(f, "failed to decode response: {err}"),
            Error::Config(msg) => write!(f, "configuration error: {msg}"),
            Error::InvalidHeader(msg) => write!(f, "invalid header value: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err.as_ref()),
            Error::Transport(err) => Some(err.as_ref()),
            Error::Decode(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(Arc::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Arc::new(err))
    }
}
