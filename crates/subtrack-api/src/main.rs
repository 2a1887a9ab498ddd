//! Subscription tracker all-in-one entry point: both services in one
//! process, joined by the in-process event channel.

use std::error::Error;

use subtrack_api::config::AllInOneConfig;
use subtrack_api::{runtime, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AllInOneConfig::from_env()?;
    let guard = telemetry::init(&config.telemetry)?;

    tracing::info!("Starting subscription tracker (all-in-one)");

    let result = runtime::run_all_in_one(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "all-in-one stopped with an error");
    }

    guard.shutdown();
    Ok(result?)
}
