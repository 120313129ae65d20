//! Wire-level request and response structures of the REST API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RelyingParty;
use crate::hash::HashToSign;

/// Language of the text shown on the end user's phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    Est,
    Eng,
    Rus,
    Lit,
}

/// Encoding of the optional display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayTextFormat {
    #[serde(rename = "GSM-7")]
    Gsm7,
    #[serde(rename = "UCS-2")]
    Ucs2,
}

/// Body of `POST /certificate`.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateRequest {
    #[serde(rename = "relyingPartyUUID")]
    pub relying_party_uuid: Uuid,
    #[serde(rename = "relyingPartyName")]
    pub relying_party_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "nationalIdentityNumber")]
    pub national_identity_number: String,
}

impl CertificateRequest {
    pub fn new(
        relying_party: &RelyingParty,
        phone_number: impl Into<String>,
        national_identity_number: impl Into<String>,
    ) -> Self {
        Self {
            relying_party_uuid: relying_party.uuid,
            relying_party_name: relying_party.name.clone(),
            phone_number: phone_number.into(),
            national_identity_number: national_identity_number.into(),
        }
    }
}

/// Body of `POST /authentication`.
///
/// The hash is a random challenge generated by the relying party; its
/// verification code is shown on the phone before the user confirms.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationRequest {
    #[serde(rename = "relyingPartyUUID")]
    pub relying_party_uuid: Uuid,
    #[serde(rename = "relyingPartyName")]
    pub relying_party_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "nationalIdentityNumber")]
    pub national_identity_number: String,
    /// Base64-encoded digest to be signed on the SIM.
    pub hash: String,
    #[serde(rename = "hashType")]
    pub hash_type: String,
    pub language: Language,
    #[serde(rename = "displayText", skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(rename = "displayTextFormat", skip_serializing_if = "Option::is_none")]
    pub display_text_format: Option<DisplayTextFormat>,
}

impl AuthenticationRequest {
    pub fn new(
        relying_party: &RelyingParty,
        phone_number: impl Into<String>,
        national_identity_number: impl Into<String>,
        hash: &HashToSign,
        language: Language,
    ) -> Self {
        Self {
            relying_party_uuid: relying_party.uuid,
            relying_party_name: relying_party.name.clone(),
            phone_number: phone_number.into(),
            national_identity_number: national_identity_number.into(),
            hash: hash.hash_base64(),
            hash_type: hash.hash_type().api_name().to_string(),
            language,
            display_text: None,
            display_text_format: None,
        }
    }

    pub fn with_display_text(
        mut self,
        text: impl Into<String>,
        format: DisplayTextFormat,
    ) -> Self {
        self.display_text = Some(text.into());
        self.display_text_format = Some(format);
        self
    }
}

/// Body of `POST /signature`. Same shape as authentication, but the hash
/// is the digest of a real document rather than a random challenge.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureRequest {
    #[serde(rename = "relyingPartyUUID")]
    pub relying_party_uuid: Uuid,
    #[serde(rename = "relyingPartyName")]
    pub relying_party_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "nationalIdentityNumber")]
    pub national_identity_number: String,
    pub hash: String,
    #[serde(rename = "hashType")]
    pub hash_type: String,
    pub language: Language,
    #[serde(rename = "displayText", skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(rename = "displayTextFormat", skip_serializing_if = "Option::is_none")]
    pub display_text_format: Option<DisplayTextFormat>,
}

impl SignatureRequest {
    pub fn new(
        relying_party: &RelyingParty,
        phone_number: impl Into<String>,
        national_identity_number: impl Into<String>,
        hash: &HashToSign,
        language: Language,
    ) -> Self {
        Self {
            relying_party_uuid: relying_party.uuid,
            relying_party_name: relying_party.name.clone(),
            phone_number: phone_number.into(),
            national_identity_number: national_identity_number.into(),
            hash: hash.hash_base64(),
            hash_type: hash.hash_type().api_name().to_string(),
            language,
            display_text: None,
            display_text_format: None,
        }
    }

    pub fn with_display_text(
        mut self,
        text: impl Into<String>,
        format: DisplayTextFormat,
    ) -> Self {
        self.display_text = Some(text.into());
        self.display_text_format = Some(format);
        self
    }
}

/// Opaque session identifier returned by every initiator.
///
/// Valid for exactly one poll sequence; once a COMPLETE status has been
/// observed for it, the server forgets the session and further polls
/// report it as not found.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionHandle {
    #[serde(rename = "sessionID")]
    pub session_id: String,
}

/// The three operation flows sharing the session status protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Certificate,
    Authentication,
    Signature,
}

impl OperationKind {
    pub fn start_path(&self) -> &'static str {
        match self {
            OperationKind::Certificate => "certificate",
            OperationKind::Authentication => "authentication",
            OperationKind::Signature => "signature",
        }
    }

    /// Status endpoint for one session of this kind. The identifier is
    /// opaque server data and gets URL-escaped before interpolation.
    pub fn session_path(&self, session_id: &str) -> String {
        format!(
            "{}/session/{}",
            self.start_path(),
            urlencoding::encode(session_id)
        )
    }
}
