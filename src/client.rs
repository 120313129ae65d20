//! High-level connector tying the initiators and the poller together.

use crate::config::{ConnectorConfig, RelyingParty};
use crate::error::MidError;
use crate::models::{
    AuthenticationRequest, CertificateRequest, OperationKind, SessionHandle, SignatureRequest,
};
use crate::session::{CancellationToken, SessionStatus, SessionStatusPoller};
use crate::transport::RestTransport;

/// Client for the Mobile-ID REST service.
///
/// Built once from an immutable [`ConnectorConfig`] and shared freely:
/// the transport is stateless and distinct sessions carry no shared
/// mutable state, so one connector can serve many concurrent end users.
#[derive(Debug, Clone)]
pub struct MobileIdConnector {
    transport: RestTransport,
    relying_party: RelyingParty,
    poller: SessionStatusPoller,
}

impl MobileIdConnector {
    pub fn new(config: &ConnectorConfig) -> Result<Self, MidError> {
        let transport = RestTransport::new(&config.base_url, config.request_timeout())?;
        let poller = SessionStatusPoller::new(
            transport.clone(),
            config.poll_interval(),
            config.poll_timeout(),
        );
        Ok(Self {
            transport,
            relying_party: config.relying_party(),
            poller,
        })
    }

    /// The relying party this connector was configured with; request
    /// constructors in [`crate::models`] take it by reference.
    pub fn relying_party(&self) -> &RelyingParty {
        &self.relying_party
    }

    /// Starts a certificate choice session.
    ///
    /// Not idempotent: every call creates an independent server-side
    /// session.
    pub async fn request_certificate(
        &self,
        request: &CertificateRequest,
    ) -> Result<SessionHandle, MidError> {
        self.start(OperationKind::Certificate, request).await
    }

    /// Starts an authentication session. Every call triggers a new
    /// confirmation prompt on the end user's phone.
    pub async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<SessionHandle, MidError> {
        self.start(OperationKind::Authentication, request).await
    }

    /// Starts a signature session. Every call triggers a new
    /// confirmation prompt on the end user's phone.
    pub async fn sign(&self, request: &SignatureRequest) -> Result<SessionHandle, MidError> {
        self.start(OperationKind::Signature, request).await
    }

    async fn start<B: serde::Serialize>(
        &self,
        kind: OperationKind,
        request: &B,
    ) -> Result<SessionHandle, MidError> {
        tracing::info!(operation = kind.start_path(), "starting session");
        let handle: SessionHandle = self.transport.post(kind.start_path(), request).await?;
        if handle.session_id.is_empty() {
            return Err(MidError::Transport {
                status: 200,
                body: "response contained an empty sessionID".to_string(),
            });
        }
        tracing::debug!(session_id = %handle.session_id, "session created");
        Ok(handle)
    }

    /// Polls the session to its terminal status. See
    /// [`SessionStatusPoller::fetch_final_status`].
    pub async fn fetch_final_status(
        &self,
        kind: OperationKind,
        session_id: &str,
    ) -> Result<SessionStatus, MidError> {
        self.poller.fetch_final_status(kind, session_id).await
    }

    /// Cancellable variant of [`fetch_final_status`](Self::fetch_final_status).
    pub async fn fetch_final_status_with_cancel(
        &self,
        kind: OperationKind,
        session_id: &str,
        cancel: &CancellationToken,
    ) -> Result<SessionStatus, MidError> {
        self.poller
            .fetch_final_status_with_cancel(kind, session_id, cancel)
            .await
    }
}
