//! Creation Service entry point.

use std::error::Error;

use subtrack_api::config::CreationConfig;
use subtrack_api::{runtime, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = CreationConfig::from_env()?;
    let guard = telemetry::init(&config.telemetry)?;

    tracing::info!(addr = %config.bind_addr, "Starting creation service");

    let result = runtime::run_creation_service(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "creation service stopped with an error");
    }

    guard.shutdown();
    Ok(result?)
}
