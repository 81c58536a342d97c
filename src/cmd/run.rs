//! `customer-service run` — start the service.
//!
//! Builds the HTTP client, tracer and preference client explicitly from
//! the parsed arguments, then serves the router until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::error::CustomerServiceError;
use crate::logging;
use crate::preference::PreferenceClient;
use crate::server::{self, AppState};
use crate::trace::Tracer;

pub async fn execute(args: RunArgs) -> Result<(), CustomerServiceError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let preference = PreferenceClient::new(server::build_http_client(), args.preference_url);
    let preference_url = preference.url().to_string();
    let state = Arc::new(AppState {
        preference: Box::new(preference),
        tracer: Tracer::new(args.service_name.clone()),
    });

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        preference_url = %preference_url,
        service = %args.service_name,
        "customer service started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("customer service stopped");
    Ok(())
}
