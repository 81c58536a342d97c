//! Customer service: one node of a microservices call chain.
//!
//! It receives customer requests, tags the request span with tracing
//! baggage, calls the downstream preference service and assembles the
//! response from static data plus the downstream result.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line and environment configuration with clap.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`customer`] -- The `POST /` and `GET /customer` handlers and the
//!   [`Customer`](customer::model::Customer) model.
//! - [`error`] -- Error types using `thiserror`, including the tagged
//!   [`DownstreamError`](error::DownstreamError).
//! - [`health`] -- `GET /health/ready` and `GET /health/live` health checks.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`preference`] -- HTTP client for the downstream preference service.
//! - [`server`] -- Axum router, shared application state, HTTP client, and
//!   graceful shutdown.
//! - [`trace`] -- Request spans, baggage, and W3C context propagation.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod customer;
pub mod error;
pub mod health;
pub mod logging;
pub mod preference;
pub mod server;
pub mod trace;
