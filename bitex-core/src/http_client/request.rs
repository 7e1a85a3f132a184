use crate::error::{Error, Result};
use crate::request::HttpMethod;
use crate::signed_request::{RequestBody, SignedRequest};
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::multipart::Form;
use std::borrow::Cow;
use tracing::{debug, error, instrument};

use super::Transport;
use super::builder::HttpClient;
use super::response::RawResponse;

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// `url` with its query replaced: unauthenticated keys and signatures travel there.
pub(crate) fn redacted_url(url: &str) -> Cow<'_, str> {
    match url.split_once('?') {
        Some((path, _)) => Cow::Owned(format!("{path}?[REDACTED]")),
        None => Cow::Borrowed(url),
    }
}

#[async_trait]
impl Transport for HttpClient {
    /// Executes a signed request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request body exceeds `max_request_size`
    /// - The request times out ([`Error::Timeout`])
    /// - Network communication fails
    /// - The response exceeds `max_response_size`
    #[instrument(
        name = "http_execute",
        skip(self, request),
        fields(method = %request.method(), url = %redacted_url(request.url()), status)
    )]
    async fn execute(&self, request: SignedRequest) -> Result<RawResponse> {
        let (method, url, mut headers, body, basic_auth) = request.into_parts();

        if let Some(content_type) = body.content_type()
            && !headers.contains_key(CONTENT_TYPE)
        {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }

        let mut builder = self
            .client()
            .request(to_reqwest(method), &url)
            .headers(headers);

        if let Some(auth) = basic_auth {
            builder = builder.basic_auth(auth.username, Some(auth.password.expose_secret()));
        }

        match body {
            RequestBody::Empty => {}
            RequestBody::Form(text) | RequestBody::Json(text) => {
                if text.len() > self.config().max_request_size {
                    return Err(Error::invalid_request(format!(
                        "Request body {} bytes exceeds limit {} bytes",
                        text.len(),
                        self.config().max_request_size
                    )));
                }
                if self.config().verbose {
                    debug!(body = %text, "HTTP request with body");
                }
                builder = builder.body(text);
            }
            RequestBody::Multipart(fields) => {
                if self.config().verbose {
                    debug!(fields = fields.len(), "HTTP request with multipart body");
                }
                let form = fields
                    .iter()
                    .fold(Form::new(), |form, (k, v)| form.text(k.to_string(), v.to_string()));
                builder = builder.multipart(form);
            }
        }

        let log_url = redacted_url(&url);
        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            error!(error = %e, "HTTP request send failed");
            if e.is_timeout() {
                Error::timeout(format!(
                    "Request to {log_url} timed out after {}ms",
                    self.config().timeout.as_millis()
                ))
            } else {
                Error::from(e)
            }
        })?;

        self.read_response(response, &log_url).await
    }
}
