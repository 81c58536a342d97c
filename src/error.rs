//! Unified error types for the customer service.
//!
//! [`CustomerServiceError`] covers process-level failures (startup,
//! binding, the `health` subcommand). [`DownstreamError`] is the tagged
//! result of a call to the preference service and is matched
//! exhaustively by every request handler.

use bytes::Bytes;
use hyper::StatusCode;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CustomerServiceError {
    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check {endpoint} failed with status {status}")]
    HealthCheckFailed {
        endpoint: &'static str,
        status: StatusCode,
    },
}

/// Failure of a single call to the preference service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DownstreamError {
    /// The downstream answered with a 4xx or 5xx status.
    #[error("{status} from preference service: {}", String::from_utf8_lossy(.body).trim())]
    Status { status: StatusCode, body: Bytes },

    /// No usable response could be obtained.
    #[error("{message}")]
    Transport { message: String },
}

impl DownstreamError {
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Render an error together with its `source()` chain, separated by `: `.
///
/// hyper's top-level errors are terse ("client error (Connect)"); the
/// useful detail sits further down the chain.
#[must_use]
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    use std::fmt::Write;
    let mut buf = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !buf.ends_with(&text) {
            // write! to String is infallible
            let _ = write!(buf, ": {text}");
        }
        source = cause.source();
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] Inner);

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Inner;

    #[test]
    fn chain_includes_sources() {
        assert_eq!(error_chain(&Outer(Inner)), "outer: connection refused");
    }

    #[test]
    fn chain_without_source_is_display() {
        assert_eq!(error_chain(&Inner), "connection refused");
    }

    #[test]
    fn transport_displays_message_only() {
        let err = DownstreamError::transport("I/O error on GET request");
        assert_eq!(err.to_string(), "I/O error on GET request");
    }

    #[test]
    fn status_display_mentions_code_and_body() {
        let err = DownstreamError::Status {
            status: StatusCode::NOT_FOUND,
            body: Bytes::from_static(b" item missing \n"),
        };
        assert_eq!(
            err.to_string(),
            "404 Not Found from preference service: item missing"
        );
    }
}
