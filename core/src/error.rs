//! Error types for the Gitea API client.
//!
//! # Design
//! Failures are classified by what the caller can do about them: fix the
//! input (`InvalidArgument`), re-authenticate (`Authentication`), report a
//! malformed server reply (`Parse`) or give up / retry later (`Transport`).
//! A 404 on a lookup is not an error at all; lookups return `Ok(None)`.

use thiserror::Error;

use crate::http::HttpError;

/// Errors returned by `GiteaClient` operations.
#[derive(Debug, Error)]
pub enum GiteaError {
    /// A required input was missing or malformed. Detected before any network
    /// activity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No token was configured for an authenticated call, or the server
    /// answered 401/403.
    #[error("authentication failed{}: {message}", status_suffix(.status))]
    Authentication {
        status: Option<u16>,
        message: String,
    },

    /// The response body was not valid JSON or carried no usable content.
    #[error("cannot parse response: {0}")]
    Parse(String),

    /// The exchange failed at the network level, or the server answered with
    /// a status the operation does not expect. For status failures `message`
    /// holds the raw response body.
    #[error("transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The operation is not implemented by this service.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl GiteaError {
    /// HTTP status attached to the error, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GiteaError::Authentication { status, .. } | GiteaError::Transport { status, .. } => {
                *status
            }
            _ => None,
        }
    }
}

impl From<HttpError> for GiteaError {
    fn from(err: HttpError) -> Self {
        GiteaError::Transport {
            status: None,
            message: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}
