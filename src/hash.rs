//! Digests sent for signing and the phone-side verification code.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;
use ring::digest;

/// Digest algorithms accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    Sha256,
    Sha384,
    Sha512,
}

impl HashType {
    /// Name used in the `hashType` request field.
    pub fn api_name(&self) -> &'static str {
        match self {
            HashType::Sha256 => "SHA256",
            HashType::Sha384 => "SHA384",
            HashType::Sha512 => "SHA512",
        }
    }

    pub fn digest_len(&self) -> usize {
        match self {
            HashType::Sha256 => 32,
            HashType::Sha384 => 48,
            HashType::Sha512 => 64,
        }
    }

    fn algorithm(&self) -> &'static digest::Algorithm {
        match self {
            HashType::Sha256 => &digest::SHA256,
            HashType::Sha384 => &digest::SHA384,
            HashType::Sha512 => &digest::SHA512,
        }
    }
}

/// A digest does not match the declared algorithm's output length.
#[derive(Debug, thiserror::Error)]
#[error("digest is {actual} bytes, {expected} expected for {hash_type}")]
pub struct InvalidDigestLength {
    pub hash_type: &'static str,
    pub expected: usize,
    pub actual: usize,
}

/// The digest a signature or authentication operation asks the SIM to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashToSign {
    hash: Vec<u8>,
    hash_type: HashType,
}

impl HashToSign {
    /// Digests `data` with the given algorithm.
    pub fn from_data(data: &[u8], hash_type: HashType) -> Self {
        let hash = digest::digest(hash_type.algorithm(), data).as_ref().to_vec();
        Self { hash, hash_type }
    }

    /// Wraps an externally computed digest.
    pub fn from_digest(digest: Vec<u8>, hash_type: HashType) -> Result<Self, InvalidDigestLength> {
        if digest.len() != hash_type.digest_len() {
            return Err(InvalidDigestLength {
                hash_type: hash_type.api_name(),
                expected: hash_type.digest_len(),
                actual: digest.len(),
            });
        }
        Ok(Self {
            hash: digest,
            hash_type,
        })
    }

    /// Random challenge for an authentication request.
    pub fn generate_random(hash_type: HashType) -> Self {
        let mut hash = vec![0u8; hash_type.digest_len()];
        rand::rng().fill_bytes(&mut hash);
        Self { hash, hash_type }
    }

    pub fn hash_type(&self) -> HashType {
        self.hash_type
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Base64 encoding used in the `hash` request field.
    pub fn hash_base64(&self) -> String {
        BASE64.encode(&self.hash)
    }

    /// The 4-digit code the phone displays so the user can match the
    /// prompt to this request: 6 high bits of the first digest byte and
    /// 7 low bits of the last, zero-padded.
    pub fn verification_code(&self) -> String {
        let first = u32::from(self.hash[0] & 0xFC) << 5;
        let last = u32::from(self.hash[self.hash.len() - 1] & 0x7F);
        format!("{:04}", first | last)
    }
}
