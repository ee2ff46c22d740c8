//! Status-code classification shared by every operation.
//!
//! Each operation names the one status it expects on success and whether a
//! 404 means "no such entity" (lookups) or an unexpected failure (mutations).
//! 401 and 403 are both authentication failures; anything else is a
//! transport failure carrying the status and raw body.

use crate::error::GiteaError;
use crate::http::HttpResponse;

/// How a 404 response is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    /// The entity does not exist; report absence.
    Absent,
    /// The entity was expected to exist; report a transport failure.
    Failure,
}

/// Successful classification of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Absent,
}

/// Map a response status to an `Outcome` or a classified error.
pub fn classify(
    response: &HttpResponse,
    expected: u16,
    not_found: NotFound,
) -> Result<Outcome, GiteaError> {
    match response.status {
        status if status == expected => Ok(Outcome::Success),
        404 if not_found == NotFound::Absent => Ok(Outcome::Absent),
        status @ (401 | 403) => Err(GiteaError::Authentication {
            status: Some(status),
            message: response.body.clone(),
        }),
        status => Err(GiteaError::Transport {
            status: Some(status),
            message: response.body.clone(),
        }),
    }
}
