use crate::error::SigningError;
use crate::params::{ParamValue, ParameterSet};

/// Name of the field that carries the computed signature.
pub const SIGNATURE_FIELD: &str = "Signature";

/// Builds the canonical signing input:
/// `k1=v1&k2=v2&...&SecretKey=<secret>`.
///
/// Entries that are null, render to an empty string, or are the
/// `Signature` field itself are skipped. Keys are ordered byte-wise.
///
/// The result embeds the secret. Never log it.
pub fn canonical_string(params: &ParameterSet, secret_key: &str) -> Result<String, SigningError> {
    if secret_key.is_empty() {
        return Err(SigningError::EmptySecret);
    }

    let mut fragments: Vec<(&str, String)> = Vec::with_capacity(params.len());
    for (key, value) in params.iter() {
        if key == SIGNATURE_FIELD {
            continue;
        }
        if let ParamValue::Float(f) = value {
            if !f.is_finite() {
                return Err(SigningError::UnsupportedValue {
                    key: key.to_string(),
                    reason: format!("non-finite number {f}"),
                });
            }
        }
        match value.canonical_form() {
            Some(text) if !text.is_empty() => fragments.push((key, text)),
            _ => {}
        }
    }

    if fragments.is_empty() {
        return Err(SigningError::NoParameters);
    }

    // Ordinal byte order, not locale collation.
    fragments.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    let joined = fragments
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!("{joined}&SecretKey={secret_key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_vector_input() {
        let params = ParameterSet::new()
            .with("Timestamp", "1000")
            .with("AccountId", "acc1");
        assert_eq!(
            canonical_string(&params, "k1").unwrap(),
            "AccountId=acc1&Timestamp=1000&SecretKey=k1"
        );
    }

    #[test]
    fn empty_and_null_values_are_skipped() {
        let params = ParameterSet::new()
            .with("A", "1")
            .with("B", "")
            .with("C", ParamValue::Null);
        assert_eq!(canonical_string(&params, "s").unwrap(), "A=1&SecretKey=s");
    }

    #[test]
    fn signature_field_is_skipped() {
        let params = ParameterSet::new()
            .with("A", "1")
            .with(SIGNATURE_FIELD, "abc=");
        assert_eq!(canonical_string(&params, "s").unwrap(), "A=1&SecretKey=s");
    }

    #[test]
    fn values_are_not_encoded() {
        let params = ParameterSet::new()
            .with("Image", "https://x.test/a b.jpg?w=1&h=2")
            .with("Scale", 0.5)
            .with("Quality", 90)
            .with("Text", "绝密资料");
        assert_eq!(
            canonical_string(&params, "s").unwrap(),
            "Image=https://x.test/a b.jpg?w=1&h=2&Quality=90&Scale=0.5&Text=绝密资料&SecretKey=s"
        );
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        let params = ParameterSet::new()
            .with("mask", "m")
            .with("image", "i")
            .with("Timestamp", "1")
            .with("AccountId", "a");
        assert_eq!(
            canonical_string(&params, "s").unwrap(),
            "AccountId=a&Timestamp=1&image=i&mask=m&SecretKey=s"
        );
    }

    #[test]
    fn empty_secret_rejected() {
        let params = ParameterSet::new().with("A", "1");
        assert!(matches!(canonical_string(&params, ""), Err(SigningError::EmptySecret)));
    }

    #[test]
    fn nothing_to_sign_rejected() {
        let params = ParameterSet::new().with("A", "").with("B", ParamValue::Null);
        assert!(matches!(canonical_string(&params, "s"), Err(SigningError::NoParameters)));
        assert!(matches!(
            canonical_string(&ParameterSet::new(), "s"),
            Err(SigningError::NoParameters)
        ));
    }

    #[test]
    fn non_finite_float_rejected() {
        let params = ParameterSet::new().with("Scale", f64::NAN);
        assert!(matches!(
            canonical_string(&params, "s"),
            Err(SigningError::UnsupportedValue { key, .. }) if key == "Scale"
        ));
    }
}
