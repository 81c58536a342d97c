//! `customer-service health` — check a running instance.
//!
//! Sends `GET /health/ready` and `GET /health/live` to the given URL and
//! fails on the first endpoint that does not answer 2xx.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::CustomerServiceError;

const ENDPOINTS: [&str; 2] = ["ready", "live"];

pub async fn execute(args: HealthArgs) -> Result<(), CustomerServiceError> {
    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);
    let base = args.url.trim_end_matches('/');

    for endpoint in ENDPOINTS {
        let url = format!("{base}/health/{endpoint}");
        let uri: hyper::Uri =
            url.parse().map_err(
                |e: hyper::http::uri::InvalidUri| CustomerServiceError::UriParse {
                    source: Box::new(e),
                },
            )?;

        let req = hyper::Request::builder()
            .uri(uri)
            .body(http_body_util::Full::new(bytes::Bytes::new()))
            .map_err(|e| CustomerServiceError::HttpRequest {
                source: Box::new(e),
            })?;

        let response =
            tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
                .await
                .map_err(|_| CustomerServiceError::HttpRequest {
                    source: format!("{endpoint} check timed out after 10s").into(),
                })?
                .map_err(|e| CustomerServiceError::HttpRequest {
                    source: Box::new(e),
                })?;

        let status = response.status();
        // drain so the pooled connection can be reused for the next check
        let _ = response.into_body().collect().await;

        if !status.is_success() {
            return Err(CustomerServiceError::HealthCheckFailed { endpoint, status });
        }
        println!("\u{2713} {endpoint} ({url})");
    }

    println!("customer-service is healthy ({})", args.url);
    Ok(())
}
