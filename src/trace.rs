//! Request tracing and baggage propagation on OpenTelemetry.
//!
//! A [`Tracer`] starts one [`Span`] per inbound request. The span's
//! context is extracted from the inbound `traceparent` and `baggage`
//! headers through a composite W3C propagator, so an upstream trace is
//! continued and its baggage carried along. Handlers add baggage items,
//! and [`Span::inject`] writes the context onto the outbound request.

use axum::http::HeaderMap;
use opentelemetry::baggage::BaggageExt;
use opentelemetry::propagation::{TextMapCompositePropagator, TextMapPropagator};
use opentelemetry::trace::{TraceContextExt, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{Tracer as SdkTracer, TracerProvider};

pub const TRACEPARENT: &str = "traceparent";
pub const BAGGAGE: &str = "baggage";

pub struct Tracer {
    service_name: String,
    tracer: SdkTracer,
    propagator: TextMapCompositePropagator,
}

impl Tracer {
    /// Build a tracer with W3C trace-context and baggage propagation.
    ///
    /// No exporter is installed: spans exist to carry ids and baggage
    /// across the call chain.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        let service_name = service_name.into();
        let provider = TracerProvider::builder().build();
        let tracer = provider.tracer(service_name.clone());

        Self {
            service_name,
            tracer,
            propagator: w3c_propagator(),
        }
    }

    /// Start the active span for a request, continuing inbound context.
    #[must_use]
    pub fn start_span(&self, operation: &'static str, inbound: &HeaderMap) -> Span {
        let parent = self.propagator.extract(&HeaderExtractor(inbound));
        let otel_span = self.tracer.start_with_context(operation, &parent);
        let span = Span {
            operation,
            cx: parent.with_span(otel_span),
        };
        tracing::debug!(
            service = %self.service_name,
            operation,
            trace_id = %span.trace_id(),
            span_id = %span.span_id(),
            "span started"
        );
        span
    }
}

/// `traceparent` plus `baggage`, the headers the call chain understands.
fn w3c_propagator() -> TextMapCompositePropagator {
    let propagators: Vec<Box<dyn TextMapPropagator + Send + Sync>> = vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ];
    TextMapCompositePropagator::new(propagators)
}

#[derive(Debug, Clone)]
pub struct Span {
    operation: &'static str,
    cx: Context,
}

impl Span {
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    #[must_use]
    pub fn trace_id(&self) -> String {
        self.cx.span().span_context().trace_id().to_string()
    }

    #[must_use]
    pub fn span_id(&self) -> String {
        self.cx.span().span_context().span_id().to_string()
    }

    pub fn set_baggage_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.cx = self
            .cx
            .with_baggage([KeyValue::new(key.into(), value.into())]);
    }

    #[must_use]
    pub fn baggage_item(&self, key: &str) -> Option<String> {
        self.cx
            .baggage()
            .get(key.to_string())
            .map(|value| value.as_str().into_owned())
    }

    /// Write `traceparent` and `baggage` onto outbound headers.
    pub fn inject(&self, headers: &mut HeaderMap) {
        w3c_propagator().inject_context(&self.cx, &mut HeaderInjector(headers));
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const PARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn tracer() -> Tracer {
        Tracer::new("customer")
    }

    #[test]
    fn starts_new_trace_without_inbound_context() {
        let span = tracer().start_span("GET /customer", &HeaderMap::new());
        assert_eq!(span.trace_id().len(), 32);
        assert_ne!(span.trace_id(), "00000000000000000000000000000000");
        assert_eq!(span.span_id().len(), 16);
        assert_eq!(span.baggage_item("user-agent"), None);
    }

    #[test]
    fn continues_inbound_traceparent() {
        let mut inbound = HeaderMap::new();
        inbound.insert(TRACEPARENT, HeaderValue::from_static(PARENT));
        let span = tracer().start_span("GET /customer", &inbound);
        assert_eq!(span.trace_id(), "4bf92f3577b34da6a3ce929d0e0e4736");
        assert_ne!(span.span_id(), "00f067aa0ba902b7");
    }

    #[test]
    fn continues_higher_version_traceparent() {
        let mut inbound = HeaderMap::new();
        inbound.insert(
            TRACEPARENT,
            HeaderValue::from_static("01-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-extra"),
        );
        let span = tracer().start_span("GET /customer", &inbound);
        assert_eq!(span.trace_id(), "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[test]
    fn ignores_all_zero_trace_id() {
        let mut inbound = HeaderMap::new();
        inbound.insert(
            TRACEPARENT,
            HeaderValue::from_static("00-00000000000000000000000000000000-00f067aa0ba902b7-01"),
        );
        let span = tracer().start_span("GET /customer", &inbound);
        assert_ne!(span.trace_id(), "00000000000000000000000000000000");
    }

    #[test]
    fn carries_inbound_baggage() {
        let mut inbound = HeaderMap::new();
        inbound.insert(
            BAGGAGE,
            HeaderValue::from_static("tenant=acme;prop=1, region=eu%20west"),
        );
        let span = tracer().start_span("POST /", &inbound);
        assert_eq!(span.baggage_item("tenant").as_deref(), Some("acme"));
        assert_eq!(span.baggage_item("region").as_deref(), Some("eu west"));
    }

    #[test]
    fn injects_current_span_as_traceparent() {
        let span = tracer().start_span("POST /", &HeaderMap::new());

        let mut headers = HeaderMap::new();
        span.inject(&mut headers);

        assert_eq!(
            headers.get(TRACEPARENT).unwrap().to_str().unwrap(),
            format!("00-{}-{}-01", span.trace_id(), span.span_id())
        );
    }

    #[test]
    fn injected_baggage_reaches_next_hop() {
        let mut span = tracer().start_span("GET /customer", &HeaderMap::new());
        span.set_baggage_item("user-agent", "Mozilla/5.0 (X11) café");
        span.set_baggage_item("user-preference", "dark,mode");

        let mut headers = HeaderMap::new();
        span.inject(&mut headers);
        assert!(headers.get(BAGGAGE).unwrap().to_str().is_ok());

        let next = Tracer::new("preference").start_span("GET /", &headers);
        assert_eq!(next.trace_id(), span.trace_id());
        assert_eq!(
            next.baggage_item("user-agent").as_deref(),
            Some("Mozilla/5.0 (X11) café")
        );
        assert_eq!(next.baggage_item("user-preference").as_deref(), Some("dark,mode"));
    }

    #[test]
    fn later_baggage_items_keep_earlier_ones() {
        let mut span = tracer().start_span("GET /customer", &HeaderMap::new());
        span.set_baggage_item("user-agent", "curl/8.0");
        span.set_baggage_item("user-preference", "dark");
        assert_eq!(span.baggage_item("user-agent").as_deref(), Some("curl/8.0"));
        assert_eq!(span.baggage_item("user-preference").as_deref(), Some("dark"));
    }

    #[test]
    fn no_baggage_header_when_empty() {
        let span = tracer().start_span("POST /", &HeaderMap::new());
        let mut headers = HeaderMap::new();
        span.inject(&mut headers);
        assert!(headers.get(BAGGAGE).is_none());
        assert!(headers.get(TRACEPARENT).is_some());
    }
}
