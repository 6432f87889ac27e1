//! Digest computation for hashing jobs.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha512};
use thiserror::Error;

/// Errors that can occur while computing a digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The hash function failed to produce a digest.
    #[error("Digest computation failed: {reason}")]
    Failed { reason: String },
}

/// Sensitive input to a hashing job.
///
/// `Debug` never prints the contents so payloads cannot leak into logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload(<redacted, {} bytes>)", self.0.len())
    }
}

/// Computes the transport-encoded digest of a payload.
pub trait Digester: Send + Sync {
    /// Returns the name of this digester implementation.
    fn name(&self) -> &str;

    /// Hash the payload and return the encoded digest.
    fn digest(&self, payload: &Payload) -> Result<String, DigestError>;
}

/// SHA-512 digest encoded with standard (padded) base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512Digester;

impl Sha512Digester {
    pub fn new() -> Self {
        Self
    }
}

impl Digester for Sha512Digester {
    fn name(&self) -> &str {
        "sha512-base64"
    }

    fn digest(&self, payload: &Payload) -> Result<String, DigestError> {
        let hash = Sha512::digest(payload.as_bytes());
        Ok(STANDARD.encode(hash))
    }
}
