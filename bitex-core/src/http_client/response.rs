use crate::error::{Error, NetworkError, Result};
use reqwest::Response;
use reqwest::header::HeaderMap;
use tracing::{debug, error, warn};

use super::builder::HttpClient;

const BODY_PREVIEW_SIZE: usize = 200;

/// A response exactly as received.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for `status`.
    pub reason: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Builds a response; the reason phrase is derived from `status`.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();
        Self {
            status,
            reason,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First bytes of the body as lossy text, for logs.
    pub fn body_preview(&self) -> String {
        let end = self.body.len().min(BODY_PREVIEW_SIZE);
        String::from_utf8_lossy(&self.body[..end]).into_owned()
    }
}

impl HttpClient {
    pub(crate) async fn read_response(&self, response: Response, url: &str) -> Result<RawResponse> {
        let status = response.status();
        let headers = response.headers().clone();
        let max_size = self.config().max_response_size;

        tracing::Span::current().record("status", status.as_u16());

        if let Some(content_length) = response.content_length()
            && content_length > max_size as u64
        {
            warn!(
                url = %url,
                content_length = content_length,
                max_size = max_size,
                "Response exceeds size limit (Content-Length check)"
            );
            return Err(Error::invalid_request(format!(
                "Response size {content_length} bytes exceeds limit {max_size} bytes"
            )));
        }

        let body = self
            .stream_response_with_limit(response, url, max_size)
            .await?;

        let raw = RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers,
            body,
        };

        if raw.is_success() {
            debug!(
                status = raw.status,
                body_length = raw.body.len(),
                body_preview = %raw.body_preview(),
                "HTTP response received"
            );
        } else {
            warn!(
                status = raw.status,
                reason = %raw.reason,
                body_preview = %raw.body_preview(),
                "HTTP error response"
            );
        }

        Ok(raw)
    }

    async fn stream_response_with_limit(
        &self,
        response: Response,
        url: &str,
        max_size: usize,
    ) -> Result<Vec<u8>> {
        use futures_util::StreamExt;

        #[allow(clippy::cast_possible_truncation)]
        let initial_capacity = response
            .content_length()
            .map_or(64 * 1024, |len| std::cmp::min(len as usize, max_size));

        let mut stream = response.bytes_stream();
        let mut body = Vec::with_capacity(initial_capacity);
        let mut accumulated_size: usize = 0;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| {
                error!(error = %e, "Failed to read response chunk");
                Error::from(NetworkError::Body(e.without_url().to_string()))
            })?;

            accumulated_size = accumulated_size.saturating_add(chunk.len());

            if accumulated_size > max_size {
                warn!(
                    url = %url,
                    accumulated_size = accumulated_size,
                    max_size = max_size,
                    "Response exceeds size limit during streaming"
                );
                return Err(Error::invalid_request(format!(
                    "Response size {accumulated_size} bytes exceeds limit {max_size} bytes (streaming)"
                )));
            }

            body.extend_from_slice(&chunk);
        }

        if body.capacity() > body.len() + body.len() / 4 {
            body.shrink_to_fit();
        }

        Ok(body)
    }
}
