//! Compares the creation store with the replica and prints the report as
//! JSON. Exits non-zero when the stores disagree; never repairs anything.

use std::process::ExitCode;

use subtrack_api::config::ReconcileConfig;
use subtrack_api::{runtime, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ReconcileConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let guard = match telemetry::init(&config.telemetry) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let code = match runtime::run_reconcile(&config).await {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!(error = %e, "failed to encode report"),
            }
            if report.is_consistent() {
                ExitCode::SUCCESS
            } else {
                tracing::warn!(
                    missing = report.missing_in_replica.len(),
                    extra = report.only_in_replica.len(),
                    mismatched = report.mismatched.len(),
                    "stores have diverged"
                );
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "reconciliation failed");
            ExitCode::from(2)
        }
    };

    guard.shutdown();
    code
}
