pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod params;
pub mod payload;
pub mod request;
pub mod signing;
pub mod transport;

pub use client::{ImageResult, OcrResult, PicTechClient};
pub use config::{ClientConfig, SecretKey, TimestampUnit};
pub use error::{PayloadError, PicTechError, SigningError, TransportError};
pub use params::{ParamValue, ParameterSet};
pub use signing::{HmacSha256Signer, RequestSigner, Signature, sign};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
