/// Failures while building the signature for a request.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Secret key must not be empty")]
    EmptySecret,
    #[error("No non-empty parameters left to sign")]
    NoParameters,
    #[error("Unsupported value for parameter {key}: {reason}")]
    UnsupportedValue { key: String, reason: String },
}

/// Failures talking to the remote service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("Failed to reach {url}: {reason}")]
    Connection { url: String, reason: String },
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Failures extracting a payload from a response body.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Response has no {0} field")]
    MissingField(String),
    #[error("Response field {0} is not a string")]
    NotAString(String),
    #[error("Invalid Base64 payload: {0}")]
    InvalidBase64(String),
    #[error("Response payload is empty")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum PicTechError {
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("API returned code {code}: {body}")]
    Api { code: i64, body: String },
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = PicTechError> = std::result::Result<T, E>;
