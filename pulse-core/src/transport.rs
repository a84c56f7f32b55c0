use reqwest::Client as HttpClient;
use reqwest::{header, StatusCode};
use url::Url;

use crate::PulseError;

/// Upper bound on how much of an error response body is kept.
pub const MAX_ERROR_BODY: usize = 64 * 1024;

/// Posts encoded payloads to one endpoint and classifies the response.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: HttpClient,
    url: Url,
    expected_status: StatusCode,
}

impl HttpTransport {
    pub(crate) fn new(http_client: HttpClient, url: Url, expected_status: StatusCode) -> Self {
        Self {
            http_client,
            url,
            expected_status,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn expected_status(&self) -> StatusCode {
        self.expected_status
    }

    /// One attempt; never retries.
    pub async fn send(&self, payload: Vec<u8>) -> Result<(), PulseError> {
        tracing::debug!(url = %self.url, bytes = payload.len(), "posting payload");

        let resp = self.http_client.post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_ENCODING, "gzip")
            .body(payload)
            .send()
            .await?;

        if resp.status() == self.expected_status {
            tracing::debug!(url = %self.url, status = %resp.status(), "payload accepted");
            return Ok(());
        }

        handle_http_err(resp).await
    }
}

async fn handle_http_err(mut resp: reqwest::Response) -> Result<(), PulseError> {
    let status = resp.status();
    let mut body = Vec::new();

    loop {
        match resp.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_ERROR_BODY - body.len();
                body.extend_from_slice(&chunk[..chunk.len().min(room)]);
                if body.len() >= MAX_ERROR_BODY {
                    break;
                }
            }
            Ok(None) => break,
            Err(source) => return Err(PulseError::BodyRead { status, source }),
        }
    }

    let body = String::from_utf8_lossy(&body).trim_end().to_string();
    tracing::debug!(%status, "payload rejected");
    Err(PulseError::HttpStatus { status, body })
}
