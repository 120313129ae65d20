//! Error taxonomy of the connector and the HTTP status classifier.

use reqwest::StatusCode;
use serde::Deserialize;

/// Errors surfaced by the Mobile-ID connector.
///
/// Every non-2xx server response maps to exactly one of the first five
/// variants via [`classify`]; the remaining variants originate on the
/// client side (poll budget, caller abort, connection failure).
#[derive(Debug, thiserror::Error)]
pub enum MidError {
    /// The server rejected a request field (HTTP 400), e.g. a malformed
    /// phone number or national identity number.
    #[error("missing or invalid parameter: {reason}")]
    MissingOrInvalidParameter { reason: String },

    /// The relying party UUID/name pair was not recognized (HTTP 401).
    #[error("relying party credentials rejected: {reason}")]
    Unauthorized { reason: String },

    /// The relying party is not allowed to perform this operation (HTTP 403).
    #[error("relying party forbidden: {reason}")]
    Forbidden { reason: String },

    /// The session identifier is unknown or has expired (HTTP 404).
    /// Permanent for the given identifier; never retried.
    #[error("session {session_id} was not found or has expired")]
    SessionNotFound { session_id: String },

    /// A non-2xx response outside the mapped set. Carries the raw status
    /// and body for diagnostics.
    #[error("unexpected HTTP status {status}: {body}")]
    Transport { status: u16, body: String },

    /// The session did not reach a terminal state within the poll budget.
    #[error("session {session_id} did not complete within {waited_ms} ms")]
    PollingTimeout { session_id: String, waited_ms: u64 },

    /// The caller aborted the poll loop through a cancellation token.
    #[error("polling of session {session_id} was cancelled")]
    Cancelled { session_id: String },

    /// A connection-level failure: the request never produced a response.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// The configured base endpoint could not be parsed as a URL.
    #[error("invalid base endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Structured error body returned by the service, e.g.
/// `{"error": "phoneNumber must contain of + and numbers(8-30)"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

fn reason_from(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}

/// Maps a non-2xx response to a [`MidError`].
///
/// Pure and total: identical inputs always produce the same variant, and
/// unmapped status codes fall through to [`MidError::Transport`] with the
/// raw status and body. `session_id` gives the 404 variant its context;
/// initiator requests pass `None` and a 404 on those paths reports the
/// path itself as the missing resource.
pub fn classify(status: StatusCode, body: &str, session_id: Option<&str>) -> MidError {
    match status {
        StatusCode::BAD_REQUEST => MidError::MissingOrInvalidParameter {
            reason: reason_from(body),
        },
        StatusCode::UNAUTHORIZED => MidError::Unauthorized {
            reason: reason_from(body),
        },
        StatusCode::FORBIDDEN => MidError::Forbidden {
            reason: reason_from(body),
        },
        StatusCode::NOT_FOUND => MidError::SessionNotFound {
            session_id: session_id.unwrap_or("<none>").to_string(),
        },
        other => MidError::Transport {
            status: other.as_u16(),
            body: body.to_string(),
        },
    }
}
