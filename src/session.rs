//! Session status model and the bounded polling loop.
//!
//! One session moves through `RUNNING* -> COMPLETE` and never back; a
//! COMPLETE status is terminal and the server forgets the session once
//! it has been delivered. The poller resolves a session identifier to
//! that terminal status or to a typed failure.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use tokio::time::Instant;
pub use tokio_util::sync::CancellationToken;

use crate::error::MidError;
use crate::models::OperationKind;
use crate::transport::RestTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    Running,
    Complete,
}

/// Server-reported outcome inside a COMPLETE status.
///
/// Anything but `Ok` means the operation failed on the phone side, but
/// the poll itself still succeeded; inspecting this code is the
/// caller's job, not the poller's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionResult {
    Ok,
    Timeout,
    NotMidClient,
    UserCancelled,
    SignatureHashMismatch,
    PhoneAbsent,
    DeliveryError,
    SimError,
    /// Outcome codes added by the server after this client was built.
    #[serde(other)]
    Unknown,
}

/// Signature produced on the SIM, base64 over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionSignature {
    pub value: String,
    pub algorithm: String,
}

impl SessionSignature {
    pub fn value_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.value)
    }
}

/// One observation of a session, as returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionStatus {
    pub state: SessionState,
    /// Present once `state` is COMPLETE.
    pub result: Option<SessionResult>,
    /// Authentication and signature payload.
    pub signature: Option<SessionSignature>,
    /// Base64 DER certificate, for certificate choice and authentication.
    pub cert: Option<String>,
    /// Server-side completion timestamp.
    pub time: Option<String>,
}

impl SessionStatus {
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Terminal and the end user approved the operation.
    pub fn is_successful(&self) -> bool {
        self.is_complete() && self.result == Some(SessionResult::Ok)
    }

    pub fn cert_bytes(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.cert.as_deref().map(|c| BASE64.decode(c))
    }
}

/// Polls a session until it is COMPLETE, the wall-clock budget runs out,
/// or the server reports the identifier as unknown.
#[derive(Debug, Clone)]
pub struct SessionStatusPoller {
    transport: RestTransport,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl SessionStatusPoller {
    pub fn new(transport: RestTransport, poll_interval: Duration, poll_timeout: Duration) -> Self {
        Self {
            transport,
            poll_interval,
            poll_timeout,
        }
    }

    /// Blocks (cooperatively) until the session reaches COMPLETE.
    ///
    /// A COMPLETE status is returned as-is even when its outcome code
    /// reports a phone-side failure. `SessionNotFound` is permanent for
    /// the identifier and is never retried. Connect and read-timeout
    /// failures of a single attempt are retried within the same
    /// wall-clock budget as RUNNING responses.
    pub async fn fetch_final_status(
        &self,
        kind: OperationKind,
        session_id: &str,
    ) -> Result<SessionStatus, MidError> {
        self.poll(kind, session_id, None).await
    }

    /// Same as [`fetch_final_status`](Self::fetch_final_status), aborting
    /// with [`MidError::Cancelled`] as soon as `cancel` fires, observed
    /// both during an in-flight request and at the sleep between attempts.
    pub async fn fetch_final_status_with_cancel(
        &self,
        kind: OperationKind,
        session_id: &str,
        cancel: &CancellationToken,
    ) -> Result<SessionStatus, MidError> {
        self.poll(kind, session_id, Some(cancel)).await
    }

    async fn poll(
        &self,
        kind: OperationKind,
        session_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<SessionStatus, MidError> {
        let path = kind.session_path(session_id);
        let started = Instant::now();
        let deadline = started + self.poll_timeout;

        loop {
            if let Some(token) = cancel
                && token.is_cancelled()
            {
                return Err(MidError::Cancelled {
                    session_id: session_id.to_string(),
                });
            }

            // The budget also caps each attempt, so a hung request cannot
            // block the loop past the deadline.
            let remaining = deadline.saturating_duration_since(Instant::now());
            let attempt = tokio::time::timeout(
                remaining,
                self.transport.get_session::<SessionStatus>(&path, session_id),
            );
            let outcome = match cancel {
                Some(token) => {
                    tokio::select! {
                        outcome = attempt => outcome,
                        _ = token.cancelled() => {
                            return Err(MidError::Cancelled {
                                session_id: session_id.to_string(),
                            });
                        }
                    }
                }
                None => attempt.await,
            };
            let Ok(response) = outcome else {
                return Err(MidError::PollingTimeout {
                    session_id: session_id.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            };

            match response {
                Ok(status) if status.is_complete() => {
                    tracing::debug!(session_id, result = ?status.result, "session complete");
                    return Ok(status);
                }
                Ok(_) => {
                    tracing::trace!(session_id, "session still running");
                }
                Err(MidError::Network(e)) if e.is_connect() || e.is_timeout() => {
                    // Transient; shares the budget with RUNNING responses.
                    tracing::warn!(session_id, error = %e, "transient transport failure");
                }
                Err(other) => return Err(other),
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(MidError::PollingTimeout {
                    session_id: session_id.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }

            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.poll_interval) => {}
                        _ = token.cancelled() => {
                            return Err(MidError::Cancelled {
                                session_id: session_id.to_string(),
                            });
                        }
                    }
                }
                None => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}
