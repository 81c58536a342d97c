//! Request handlers for the customer endpoints.
//!
//! [`add_recommendation`] relays a `text/plain` payload to the preference
//! service and answers 503 when it fails. [`get_customer`] tags the
//! request span with the caller's user agent and preference, fetches the
//! preference and wraps it in a [`Customer`](model::Customer); any
//! downstream failure there yields 400 instead.

pub mod model;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::DownstreamError;
use crate::preference::headers::strip_response_hop_by_hop;
use crate::server::AppState;
use model::Customer;

pub const USER_PREFERENCE: &str = "user-preference";
pub const USER_AGENT_BAGGAGE: &str = "user-agent";

pub async fn add_recommendation(
    State(state): State<Arc<AppState>>,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !accepts_plain_text(&req_headers) {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    let span = state.tracer.start_span("POST /", &req_headers);

    match state.preference.post(&span, body).await {
        Ok(downstream) => {
            let mut resp_headers = downstream.headers;
            strip_response_hop_by_hop(&mut resp_headers);
            (downstream.status, resp_headers, downstream.body).into_response()
        }
        Err(e) => {
            tracing::warn!(
                trace_id = %span.trace_id(),
                operation = span.operation(),
                error = %e,
                "Exception trying to post to preference service"
            );
            (StatusCode::SERVICE_UNAVAILABLE, describe_failure(&e)).into_response()
        }
    }
}

pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    req_headers: HeaderMap,
) -> Response {
    let Some(user_agent) = req_headers.get(header::USER_AGENT).map(header_text) else {
        tracing::warn!("missing User-Agent header");
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut span = state.tracer.start_span("GET /customer", &req_headers);
    span.set_baggage_item(USER_AGENT_BAGGAGE, user_agent);
    if let Some(user_preference) = req_headers
        .get(USER_PREFERENCE)
        .map(header_text)
        .filter(|v| !v.is_empty())
    {
        span.set_baggage_item(USER_PREFERENCE, user_preference);
    }

    match state.preference.fetch(&span).await {
        Ok(preference) => {
            let customer = Customer::random(preference);
            tracing::info!(
                trace_id = %span.trace_id(),
                customer_id = customer.id,
                "customer assembled"
            );
            (StatusCode::OK, Json(customer)).into_response()
        }
        // 400 rather than 503 here, unlike add_recommendation
        Err(e) => {
            tracing::warn!(
                trace_id = %span.trace_id(),
                operation = span.operation(),
                error = %e,
                "Exception trying to get the response from preference service"
            );
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Body of the 503 returned when relaying a POST fails.
#[must_use]
pub fn describe_failure(err: &DownstreamError) -> String {
    match err {
        DownstreamError::Status { status, body } => {
            let body = String::from_utf8_lossy(body);
            let body = body.trim();
            let reason = if body.starts_with("null") {
                status.canonical_reason().unwrap_or_default()
            } else {
                body
            };
            format!("{} {reason}", status.as_u16()).trim_end().to_string()
        }
        DownstreamError::Transport { message } => message.clone(),
    }
}

/// Header text as sent; bytes outside visible ASCII are decoded lossily
/// instead of failing the header.
fn header_text(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

/// An absent `Content-Type` is let through; anything but `text/plain` is not.
fn accepts_plain_text(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    content_type
        .to_str()
        .ok()
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
}
