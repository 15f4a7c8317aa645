use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::PicTechError;

pub const DEFAULT_API_HOST: &str = "https://www.pictech.top/pictech/commonapi";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared secret. Only exposed for signing; `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Unit of the `Timestamp` request parameter.
///
/// Unix time carries no timezone, so a "local zone" timestamp is the same
/// number as a UTC one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampUnit {
    #[default]
    Seconds,
    Millis,
}

impl TimestampUnit {
    pub fn timestamp_at(self, time: SystemTime) -> u128 {
        let elapsed = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        match self {
            TimestampUnit::Seconds => u128::from(elapsed.as_secs()),
            TimestampUnit::Millis => elapsed.as_millis(),
        }
    }

    pub fn now(self) -> u128 {
        self.timestamp_at(SystemTime::now())
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_host: String,
    pub account_id: String,
    pub secret_key: SecretKey,
    pub connect_timeout: Duration,
    pub timestamp_unit: TimestampUnit,
}

impl ClientConfig {
    pub fn new(account_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            account_id: account_id.into(),
            secret_key: SecretKey::new(secret_key),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timestamp_unit: TimestampUnit::default(),
        }
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timestamp_unit(mut self, unit: TimestampUnit) -> Self {
        self.timestamp_unit = unit;
        self
    }

    pub fn validate(&self) -> Result<(), PicTechError> {
        if self.account_id.trim().is_empty() {
            return Err(PicTechError::Config("account id must not be empty".into()));
        }
        if self.secret_key.is_empty() {
            return Err(PicTechError::Config("secret key must not be empty".into()));
        }
        if self.api_host.trim().is_empty() {
            return Err(PicTechError::Config("api host must not be empty".into()));
        }
        Ok(())
    }

    /// Joins the host and an endpoint path with exactly one slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_host.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret() {
        let config = ClientConfig::new("acc", "hunter2");
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn validate_rejects_missing_credentials() {
        assert!(ClientConfig::new("", "k").validate().is_err());
        assert!(ClientConfig::new("acc", "").validate().is_err());
        assert!(ClientConfig::new("acc", "k").validate().is_ok());
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let config = ClientConfig::new("acc", "k").with_api_host("http://localhost:8080/api/");
        assert_eq!(config.endpoint("/tools/resize"), "http://localhost:8080/api/tools/resize");
        assert_eq!(config.endpoint("image_ocr_sync"), "http://localhost:8080/api/image_ocr_sync");
    }

    #[test]
    fn timestamp_units() {
        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(TimestampUnit::Seconds.timestamp_at(time), 1_700_000_000);
        assert_eq!(TimestampUnit::Millis.timestamp_at(time), 1_700_000_000_123);
    }
}
