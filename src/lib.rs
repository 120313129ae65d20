//! Client SDK for a Mobile-ID style REST authentication and signature
//! service: start a certificate, authentication or signature operation,
//! receive an opaque session identifier, and poll it to a terminal
//! status.

pub mod client;
pub mod config;
pub mod error;
pub mod hash;
pub mod models;
pub mod session;
pub mod telemetry;
pub mod transport;

pub use client::MobileIdConnector;
pub use config::{Config, ConnectorConfig, RelyingParty};
pub use error::MidError;
pub use hash::{HashToSign, HashType};
pub use models::{
    AuthenticationRequest, CertificateRequest, DisplayTextFormat, Language, OperationKind,
    SessionHandle, SignatureRequest,
};
pub use session::{
    CancellationToken, SessionResult, SessionSignature, SessionState, SessionStatus,
    SessionStatusPoller,
};
