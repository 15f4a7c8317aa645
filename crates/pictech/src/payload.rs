//! Response envelopes and embedded Base64 payloads.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::PayloadError;

/// Field carrying the result image in a response envelope.
pub const BASE64_FIELD: &str = "Base64";
/// `Code` value of a successful call.
pub const SUCCESS_CODE: i64 = 200;

/// Common fields of every JSON response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

impl ResponseEnvelope {
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        let body: Value =
            serde_json::from_slice(body).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;
        let code = match body.get("Code") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        let message = body.get("Message").and_then(Value::as_str).map(str::to_string);
        let request_id = body.get("RequestId").and_then(Value::as_str).map(str::to_string);
        Ok(Self {
            code,
            message,
            request_id,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }

    /// The Base64 text of `field`, without any data-URI prefix.
    pub fn base64_field(&self, field: &str) -> Result<&str, PayloadError> {
        match self.body.get(field) {
            None | Some(Value::Null) => Err(PayloadError::MissingField(field.to_string())),
            Some(Value::String(s)) => Ok(strip_data_uri(s)),
            Some(_) => Err(PayloadError::NotAString(field.to_string())),
        }
    }

    /// Decoded bytes of `field`.
    pub fn decode_field(&self, field: &str) -> Result<Vec<u8>, PayloadError> {
        decode_base64(self.base64_field(field)?)
    }
}

/// Removes a leading `data:<mime>;base64,` prefix.
///
/// Base64 never contains a comma, so everything after the first comma is
/// the payload.
pub fn strip_data_uri(value: &str) -> &str {
    match value.split_once(',') {
        Some((_, rest)) => rest,
        None => value,
    }
}

pub fn decode_base64(text: &str) -> Result<Vec<u8>, PayloadError> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| PayloadError::InvalidBase64(e.to_string()))?;
    if bytes.is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(bytes)
}

/// Locates `field` in a JSON body and returns its Base64 text, prefix stripped.
pub fn extract_base64(body: &str, field: &str) -> Result<String, PayloadError> {
    let envelope = ResponseEnvelope::parse(body.as_bytes())?;
    envelope.base64_field(field).map(str::to_string)
}

/// Locates `field` in a JSON body and decodes it.
pub fn decode_payload(body: &str, field: &str) -> Result<Vec<u8>, PayloadError> {
    ResponseEnvelope::parse(body.as_bytes())?.decode_field(field)
}

/// Every `text` string inside the `TemplateJson` field of an OCR response.
///
/// `TemplateJson` may be inline JSON or a JSON document serialized into a
/// string.
pub fn ocr_texts(body: &Value) -> Vec<String> {
    let Some(template) = body.get("TemplateJson") else {
        return Vec::new();
    };
    let parsed;
    let template = match template {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(value) => {
                parsed = value;
                &parsed
            }
            Err(_) => return Vec::new(),
        },
        other => other,
    };

    let mut texts = Vec::new();
    collect_texts(template, &mut texts);
    texts
}

fn collect_texts(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::String(s) if key == "text" => out.push(s.clone()),
                    _ => collect_texts(child, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_texts(item, out)),
        _ => {}
    }
}

pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Image MIME type guessed from a file extension, JPEG when unknown.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}
