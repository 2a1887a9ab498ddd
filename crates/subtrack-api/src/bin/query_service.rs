//! Read/Query Service entry point.

use std::error::Error;

use subtrack_api::config::QueryConfig;
use subtrack_api::{runtime, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = QueryConfig::from_env()?;
    let guard = telemetry::init(&config.telemetry)?;

    tracing::info!(
        addr = %config.bind_addr,
        creation_service = %config.creation_service_url,
        "Starting query service"
    );

    let result = runtime::run_query_service(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "query service stopped with an error");
    }

    guard.shutdown();
    Ok(result?)
}
