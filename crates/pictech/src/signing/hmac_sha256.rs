use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::canonical::canonical_string;
use super::signer::{RequestSigner, SIGNATURE_LEN, Signature};
use crate::error::SigningError;
use crate::params::ParameterSet;

type HmacSha256 = Hmac<Sha256>;

/// Signs the canonical input with HMAC-SHA256, keyed by the shared secret.
pub fn sign(params: &ParameterSet, secret_key: &str) -> Result<Signature, SigningError> {
    let input = canonical_string(params, secret_key)?;

    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|_| SigningError::EmptySecret)?;
    mac.update(input.as_bytes());
    let tag = mac.finalize().into_bytes();

    let mut bytes = [0u8; SIGNATURE_LEN];
    bytes.copy_from_slice(&tag);
    Ok(Signature::from_bytes(bytes))
}

/// [`RequestSigner`] holding the shared secret.
pub struct HmacSha256Signer {
    secret_key: String,
}

impl HmacSha256Signer {
    pub fn new(secret_key: impl Into<String>) -> Result<Self, SigningError> {
        let secret_key = secret_key.into();
        if secret_key.is_empty() {
            return Err(SigningError::EmptySecret);
        }
        Ok(Self { secret_key })
    }
}

impl RequestSigner for HmacSha256Signer {
    fn sign(&self, params: &ParameterSet) -> Result<Signature, SigningError> {
        sign(params, &self.secret_key)
    }

    fn algorithm(&self) -> &str {
        "hmac-sha256"
    }
}

impl std::fmt::Debug for HmacSha256Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha256Signer")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ParameterSet {
        ParameterSet::new()
            .with("AccountId", "acc1")
            .with("Timestamp", "1000")
    }

    #[test]
    fn deterministic_signing() {
        let sig1 = sign(&params(), "k1").unwrap();
        let sig2 = sign(&params(), "k1").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn signer_matches_free_function() {
        let signer = HmacSha256Signer::new("k1").unwrap();
        assert_eq!(signer.sign(&params()).unwrap(), sign(&params(), "k1").unwrap());
    }

    #[test]
    fn different_secrets_produce_different_signatures() {
        assert_ne!(sign(&params(), "k1").unwrap(), sign(&params(), "k2").unwrap());
    }

    #[test]
    fn empty_secret_rejected_at_construction() {
        assert!(matches!(HmacSha256Signer::new(""), Err(SigningError::EmptySecret)));
    }

    #[test]
    fn debug_hides_secret() {
        let signer = HmacSha256Signer::new("super-secret").unwrap();
        assert!(!format!("{signer:?}").contains("super-secret"));
    }

    #[test]
    fn algorithm_is_hmac_sha256() {
        let signer = HmacSha256Signer::new("k1").unwrap();
        assert_eq!(signer.algorithm(), "hmac-sha256");
    }
}
