use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{PayloadError, PicTechError, Result};
use crate::params::ParameterSet;
use crate::payload::{BASE64_FIELD, ResponseEnvelope, encode_base64, ocr_texts};
use crate::request::{
    CROP_PATH, CropRequest, INPAINT_PATH, InpaintRequest, OCR_PATH, OcrRequest, RESIZE_PATH,
    ResizeRequest, WATERMARK_PATH, WatermarkRequest,
};
use crate::signing::{HmacSha256Signer, RequestSigner, SIGNATURE_FIELD};
use crate::transport::{HttpResponse, Transport};

/// A decoded result image and the envelope it arrived in.
#[derive(Debug, Clone)]
pub struct ImageResult {
    pub bytes: Vec<u8>,
    pub envelope: ResponseEnvelope,
}

#[derive(Debug, Clone)]
pub struct OcrResult {
    pub request_id: Option<String>,
    pub texts: Vec<String>,
    pub raw: Value,
}

/// Signs and sends requests to the image API.
///
/// Holds no mutable state; share it behind an `Arc` to issue requests
/// concurrently.
pub struct PicTechClient {
    config: ClientConfig,
    signer: Arc<dyn RequestSigner>,
    transport: Arc<dyn Transport>,
}

impl PicTechClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let signer = Arc::new(HmacSha256Signer::new(config.secret_key.expose())?);
        Ok(Self {
            config,
            signer,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Adds `AccountId`, a `Timestamp` unless one is present, and `Signature`.
    pub fn sign_params(&self, mut params: ParameterSet) -> Result<ParameterSet> {
        params.insert("AccountId", self.config.account_id.as_str());
        if !params.contains_key("Timestamp") {
            params.insert("Timestamp", self.config.timestamp_unit.now().to_string());
        }
        params.remove(SIGNATURE_FIELD);

        let signature = self.signer.sign(&params)?;
        debug!(
            algorithm = self.signer.algorithm(),
            keys = ?params.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            "signed request"
        );
        params.insert(SIGNATURE_FIELD, signature.to_base64());
        Ok(params)
    }

    /// Signs `params`, posts them to `path` and returns the 2xx response.
    pub async fn call(&self, path: &str, params: ParameterSet) -> Result<HttpResponse> {
        let url = self.config.endpoint(path);
        let body = self.sign_params(params)?.to_json()?;

        debug!(%url, bytes = body.len(), "posting request");
        let response = self.transport.post_json(&url, body).await?;
        info!(%url, status = response.status, "request completed");

        match response.error_for_status() {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!(%url, error = %e, "request failed");
                Err(e.into())
            }
        }
    }

    /// Calls `path` and requires a JSON envelope with `Code` 200.
    pub async fn call_envelope(&self, path: &str, params: ParameterSet) -> Result<ResponseEnvelope> {
        let response = self.call(path, params).await?;
        let envelope = ResponseEnvelope::parse(&response.body)?;
        ensure_success(&envelope, &response)?;
        Ok(envelope)
    }

    async fn call_image(&self, path: &str, params: ParameterSet) -> Result<ImageResult> {
        let envelope = self.call_envelope(path, params).await?;
        let bytes = envelope.decode_field(BASE64_FIELD)?;
        Ok(ImageResult { bytes, envelope })
    }

    pub async fn resize(&self, request: &ResizeRequest) -> Result<ImageResult> {
        self.call_image(RESIZE_PATH, request.to_params()).await
    }

    pub async fn crop(&self, request: &CropRequest) -> Result<ImageResult> {
        self.call_image(CROP_PATH, request.to_params()).await
    }

    pub async fn watermark(&self, request: &WatermarkRequest) -> Result<ImageResult> {
        self.call_image(WATERMARK_PATH, request.to_params()).await
    }

    pub async fn ocr(&self, request: &OcrRequest) -> Result<OcrResult> {
        let envelope = self.call_envelope(OCR_PATH, request.to_params()).await?;
        let texts = ocr_texts(&envelope.body);
        Ok(OcrResult {
            request_id: envelope.request_id,
            texts,
            raw: envelope.body,
        })
    }

    /// Returns the repaired image bytes.
    ///
    /// The endpoint normally answers with the raw image. A JSON body is read
    /// as an envelope carrying `Base64` instead.
    pub async fn inpaint(&self, request: &InpaintRequest) -> Result<Vec<u8>> {
        let response = self.call(INPAINT_PATH, request.to_params()).await?;
        if response.body.is_empty() {
            return Err(PayloadError::Empty.into());
        }
        if !looks_like_json(&response.body) {
            return Ok(response.body);
        }
        let envelope = ResponseEnvelope::parse(&response.body)?;
        ensure_success(&envelope, &response)?;
        Ok(envelope.decode_field(BASE64_FIELD)?)
    }

    /// Downloads `url` and returns its bytes as plain Base64.
    pub async fn download_base64(&self, url: &str) -> Result<String> {
        debug!(%url, "downloading");
        let response = self.transport.get(url).await?.error_for_status()?;
        if response.body.is_empty() {
            return Err(PayloadError::Empty.into());
        }
        Ok(encode_base64(&response.body))
    }
}

fn ensure_success(envelope: &ResponseEnvelope, response: &HttpResponse) -> Result<()> {
    if envelope.is_success() {
        return Ok(());
    }
    warn!(code = ?envelope.code, message = ?envelope.message, "API reported failure");
    Err(PicTechError::Api {
        code: envelope.code.unwrap_or_default(),
        body: response.text(),
    })
}

fn looks_like_json(body: &[u8]) -> bool {
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_detection() {
        assert!(looks_like_json(b"  {\"Code\":200}"));
        assert!(!looks_like_json(b"\x89PNG\r\n"));
        assert!(!looks_like_json(b""));
    }
}
