mod signer;
mod canonical;
mod hmac_sha256;

pub use signer::{RequestSigner, SIGNATURE_LEN, Signature};
pub use canonical::{SIGNATURE_FIELD, canonical_string};
pub use hmac_sha256::{HmacSha256Signer, sign};
