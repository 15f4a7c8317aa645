use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::error::TransportError;

/// Status and raw body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded, for diagnostics.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Fails with the body verbatim unless the status is 2xx.
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                body: self.text(),
            })
        }
    }
}

/// Carries requests to the remote service.
///
/// Implementations never retry; each call is a single round trip.
pub trait Transport: Send + Sync {
    /// POST a JSON body.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;

    /// GET a resource, e.g. a source image to upload.
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

/// [`Transport`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    async fn finish(
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<HttpResponse, TransportError> {
        let connection_error = |e: reqwest::Error| TransportError::Connection {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = request.send().await.map_err(connection_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(connection_error)?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl Transport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*")
            .body(body);
        Self::finish(url, request).boxed()
    }

    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Self::finish(url, self.client.get(url)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_2xx_status_keeps_body() {
        let response = HttpResponse {
            status: 403,
            body: br#"{"Code":403,"Message":"Signature mismatch"}"#.to_vec(),
        };
        match response.error_for_status() {
            Err(TransportError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, r#"{"Code":403,"Message":"Signature mismatch"}"#);
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[test]
    fn success_status_passes_through() {
        let response = HttpResponse {
            status: 204,
            body: Vec::new(),
        };
        assert!(response.error_for_status().is_ok());
    }

    #[test]
    fn transport_builds_with_timeout() {
        assert!(ReqwestTransport::new(Duration::from_secs(1)).is_ok());
    }
}
