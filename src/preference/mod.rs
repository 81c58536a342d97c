//! Client for the downstream preference service.
//!
//! [`PreferenceService`] is the seam the request handlers call through;
//! [`PreferenceClient`] is the hyper-backed implementation used in
//! production. Every call makes a single attempt, injects the active
//! span's trace context, and classifies the outcome into a
//! [`DownstreamResponse`] or a [`DownstreamError`].

pub mod headers;

use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue, Method};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;

use crate::customer::model::Preference;
use crate::error::{error_chain, DownstreamError};
use crate::server::HttpClient;
use crate::trace::Span;

#[derive(Debug, Clone)]
pub struct DownstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

// async_trait keeps the trait object safe: AppState holds a Box<dyn PreferenceService>.
#[async_trait]
pub trait PreferenceService: Send + Sync {
    /// `GET` the preference for the current request.
    ///
    /// An empty body yields `Ok(None)`.
    async fn fetch(&self, span: &Span) -> Result<Option<Preference>, DownstreamError>;

    /// `POST` a `text/plain` payload and return the downstream answer as is.
    async fn post(&self, span: &Span, body: Bytes) -> Result<DownstreamResponse, DownstreamError>;
}

pub struct PreferenceClient {
    client: HttpClient,
    url: url::Url,
}

impl PreferenceClient {
    #[must_use]
    pub fn new(client: HttpClient, url: url::Url) -> Self {
        Self { client, url }
    }

    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    async fn exchange(
        &self,
        method: Method,
        span: &Span,
        mut headers: HeaderMap,
        body: Bytes,
    ) -> Result<DownstreamResponse, DownstreamError> {
        span.inject(&mut headers);

        let io_error = |cause: String| {
            DownstreamError::transport(format!(
                "I/O error on {method} request for \"{}\": {cause}",
                self.url
            ))
        };

        let mut req_builder = hyper::Request::builder()
            .method(method.clone())
            .uri(self.url.as_str());
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        let req = req_builder
            .body(Full::new(body))
            .map_err(|e| io_error(error_chain(&e)))?;

        let response = self
            .client
            .request(req)
            .await
            .map_err(|e| io_error(error_chain(&e)))?;

        let status = response.status();
        let resp_headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| io_error(format!("body read error: {}", error_chain(&e))))?
            .to_bytes();

        tracing::debug!(
            trace_id = %span.trace_id(),
            method = %method,
            status = status.as_u16(),
            "preference service responded"
        );

        if status.is_client_error() || status.is_server_error() {
            return Err(DownstreamError::Status { status, body });
        }

        Ok(DownstreamResponse {
            status,
            headers: resp_headers,
            body,
        })
    }
}

#[async_trait]
impl PreferenceService for PreferenceClient {
    async fn fetch(&self, span: &Span) -> Result<Option<Preference>, DownstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, application/*+json"),
        );

        let response = self
            .exchange(Method::GET, span, headers, Bytes::new())
            .await?;
        decode_preference(&response.body)
    }

    async fn post(&self, span: &Span, body: Bytes) -> Result<DownstreamResponse, DownstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/plain, application/json, */*"),
        );

        self.exchange(Method::POST, span, headers, body).await
    }
}

fn decode_preference(body: &[u8]) -> Result<Option<Preference>, DownstreamError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(|e| {
        DownstreamError::transport(format!(
            "Error while extracting response for type [Preference]: {e}"
        ))
    })
}
