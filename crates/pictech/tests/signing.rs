use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use pictech::signing::{HmacSha256Signer, RequestSigner, canonical_string, sign};
use pictech::{ParamValue, ParameterSet, SigningError};

fn reference_hmac(message: &str, key: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes()).unwrap();
    mac.update(message.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

fn request_params() -> ParameterSet {
    ParameterSet::new()
        .with("AccountId", "acc1")
        .with("Image", "https://example.com/source.jpeg")
        .with("Scale", 0.5)
        .with("OutputFormat", "JPEG")
        .with("Quality", 90)
        .with("Timestamp", "1769184000000")
}

// ── Reference vector ─────────────────────────────────────────────────

#[test]
fn example_vector_matches_reference_hmac() {
    let params = ParameterSet::new()
        .with("AccountId", "acc1")
        .with("Timestamp", "1000");

    let input = canonical_string(&params, "k1").unwrap();
    assert_eq!(input, "AccountId=acc1&Timestamp=1000&SecretKey=k1");

    let signature = sign(&params, "k1").unwrap();
    assert_eq!(signature.to_base64(), reference_hmac(&input, "k1"));
    assert_eq!(signature.as_bytes().len(), 32);
}

#[test]
fn typed_values_sign_like_their_text() {
    let typed = request_params();
    let text = ParameterSet::new()
        .with("AccountId", "acc1")
        .with("Image", "https://example.com/source.jpeg")
        .with("Scale", "0.5")
        .with("OutputFormat", "JPEG")
        .with("Quality", "90")
        .with("Timestamp", "1769184000000");
    assert_eq!(sign(&typed, "secret").unwrap(), sign(&text, "secret").unwrap());

    let expected = reference_hmac(
        "AccountId=acc1&Image=https://example.com/source.jpeg&OutputFormat=JPEG\
         &Quality=90&Scale=0.5&Timestamp=1769184000000&SecretKey=secret",
        "secret",
    );
    assert_eq!(sign(&typed, "secret").unwrap().to_base64(), expected);
}

#[test]
fn unicode_values_are_signed_as_utf8() {
    let params = ParameterSet::new().with("Text", "绝密资料 禁止外传");
    let expected = reference_hmac("Text=绝密资料 禁止外传&SecretKey=密钥", "密钥");
    assert_eq!(sign(&params, "密钥").unwrap().to_base64(), expected);
}

// ── Properties ───────────────────────────────────────────────────────

#[test]
fn signing_is_deterministic() {
    let first = sign(&request_params(), "k").unwrap();
    for _ in 0..10 {
        assert_eq!(sign(&request_params(), "k").unwrap(), first);
    }
}

#[test]
fn insertion_order_does_not_matter() {
    let forward: ParameterSet = [("A", "1"), ("B", "2"), ("C", "3"), ("a", "4")]
        .into_iter()
        .collect();
    let backward: ParameterSet = [("a", "4"), ("C", "3"), ("B", "2"), ("A", "1")]
        .into_iter()
        .collect();
    assert_eq!(sign(&forward, "k").unwrap(), sign(&backward, "k").unwrap());
}

#[test]
fn changing_a_value_changes_the_signature() {
    let base = sign(&request_params(), "k").unwrap();
    let mut changed = request_params();
    changed.insert("Quality", 91);
    assert_ne!(sign(&changed, "k").unwrap(), base);
}

#[test]
fn changing_the_secret_changes_the_signature() {
    assert_ne!(
        sign(&request_params(), "k1").unwrap(),
        sign(&request_params(), "k2").unwrap()
    );
}

#[test]
fn empty_values_are_excluded() {
    let with_empty = ParameterSet::new().with("A", "1").with("B", "");
    let without = ParameterSet::new().with("A", "1");
    assert_eq!(sign(&with_empty, "S").unwrap(), sign(&without, "S").unwrap());
}

#[test]
fn absent_values_are_excluded() {
    let with_null = ParameterSet::new().with("A", "1").with("B", ParamValue::Null);
    let without = ParameterSet::new().with("A", "1");
    assert_eq!(sign(&with_null, "S").unwrap(), sign(&without, "S").unwrap());
}

#[test]
fn existing_signature_is_ignored() {
    let signed = sign(&request_params(), "k").unwrap();
    let mut resent = request_params();
    resent.insert("Signature", signed.to_base64());
    assert_eq!(sign(&resent, "k").unwrap(), signed);
}

// ── Errors ───────────────────────────────────────────────────────────

#[test]
fn empty_secret_is_invalid_input() {
    assert!(matches!(sign(&request_params(), ""), Err(SigningError::EmptySecret)));
}

#[test]
fn only_empty_parameters_is_invalid_input() {
    let params = ParameterSet::new().with("Text", "");
    assert!(matches!(sign(&params, "k"), Err(SigningError::NoParameters)));
}

// ── Concurrency ──────────────────────────────────────────────────────

#[test]
fn signer_is_shareable_across_threads() {
    let signer = std::sync::Arc::new(HmacSha256Signer::new("k").unwrap());
    let expected = signer.sign(&request_params()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let signer = signer.clone();
            std::thread::spawn(move || signer.sign(&request_params()).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
