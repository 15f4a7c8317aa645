use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::SigningError;
use crate::params::ParameterSet;

/// Length of an HMAC-SHA256 tag.
pub const SIGNATURE_LEN: usize = 32;

/// Trait for signing request parameters.
///
/// Implementations are sync, signing is CPU-bound and pure.
pub trait RequestSigner: Send + Sync {
    /// Sign a parameter set. The `Signature` entry, if present, is ignored.
    fn sign(&self, params: &ParameterSet) -> Result<Signature, SigningError>;

    /// Algorithm identifier string (e.g. "hmac-sha256").
    fn algorithm(&self) -> &str;
}

/// Raw MAC bytes, rendered as standard padded Base64 on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base64())
    }
}
