//! Readiness and liveness endpoints.
//!
//! Both answer 200 with an empty body and never consult the preference
//! service, so an unavailable downstream does not take this node out of
//! rotation.

use axum::http::StatusCode;

pub async fn ready() -> StatusCode {
    StatusCode::OK
}

pub async fn live() -> StatusCode {
    StatusCode::OK
}
