//! Environment configuration for the service binaries.
//!
//! Each binary reads its settings once at startup. The `from_lookup`
//! constructors take the variable source as a function so tests can
//! supply a map instead of the process environment.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::AppError;

/// Default port of the Read/Query Service.
pub const DEFAULT_QUERY_PORT: u16 = 8080;

/// Default port of the Creation Service.
pub const DEFAULT_CREATION_PORT: u16 = 8081;

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
    }
}

fn text_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_owned())
}

fn bind_addr(host: &str, port: u16) -> Result<SocketAddr, AppError> {
    format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
}

/// Logging and span export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Name reported on exported spans.
    pub service_name: String,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// OTLP gRPC endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl TelemetryConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>, service_name: &str) -> Self {
        Self {
            service_name: service_name.to_owned(),
            log_level: text_or(lookup, "LOG_LEVEL", "info"),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        }
    }
}

/// Which event channel a standalone service uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTransport {
    /// The Kafka topic.
    Kafka,
    /// No channel: creations are not propagated.
    None,
}

impl FromStr for EventTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kafka" => Ok(Self::Kafka),
            "none" => Ok(Self::None),
            other => Err(format!("unknown transport {other:?}, expected kafka or none")),
        }
    }
}

/// Event channel settings of a standalone service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventConfig {
    /// Selected transport.
    pub transport: EventTransport,
    /// Comma-separated broker list.
    pub brokers: String,
    /// Topic carrying creation events.
    pub topic: String,
    /// Consumer group of the sync listener.
    pub group_id: String,
}

impl EventConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            transport: parse_or(lookup, "EVENT_TRANSPORT", EventTransport::Kafka)?,
            brokers: text_or(lookup, "KAFKA_BROKERS", "localhost:9092"),
            topic: text_or(
                lookup,
                "KAFKA_TOPIC",
                subtrack_core::event::SUBSCRIPTION_CREATED_TOPIC,
            ),
            group_id: text_or(
                lookup,
                "KAFKA_GROUP_ID",
                subtrack_core::event::SUBSCRIPTION_SYNC_GROUP,
            ),
        })
    }
}

/// Settings of the `creation-service` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationConfig {
    /// Creation-owned store.
    pub database_url: String,
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Event channel.
    pub events: EventConfig,
    /// Seed demo rows into an empty store.
    pub seed_demo_data: bool,
    /// Publish every stored row at startup.
    pub republish_on_startup: bool,
    /// Logging and spans.
    pub telemetry: TelemetryConfig,
}

impl CreationConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = text_or(lookup, "HOST", "0.0.0.0");
        let port = parse_or(lookup, "PORT", DEFAULT_CREATION_PORT)?;
        Ok(Self {
            database_url: required(lookup, "DATABASE_URL")?,
            bind_addr: bind_addr(&host, port)?,
            events: EventConfig::from_lookup(lookup)?,
            seed_demo_data: parse_or(lookup, "SEED_DEMO_DATA", false)?,
            republish_on_startup: parse_or(lookup, "REPUBLISH_ON_STARTUP", false)?,
            telemetry: TelemetryConfig::from_lookup(lookup, subtrack_core::resolver::CREATION_SERVICE),
        })
    }
}

/// Settings of the `query-service` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Replica store.
    pub database_url: String,
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Event channel.
    pub events: EventConfig,
    /// Base URL `POST /api/subscriptions` is forwarded to.
    pub creation_service_url: String,
    /// Logging and spans.
    pub telemetry: TelemetryConfig,
}

impl QueryConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = text_or(lookup, "HOST", "0.0.0.0");
        let port = parse_or(lookup, "PORT", DEFAULT_QUERY_PORT)?;
        Ok(Self {
            database_url: required(lookup, "DATABASE_URL")?,
            bind_addr: bind_addr(&host, port)?,
            events: EventConfig::from_lookup(lookup)?,
            creation_service_url: text_or(
                lookup,
                "CREATION_SERVICE_URL",
                &format!("http://localhost:{DEFAULT_CREATION_PORT}"),
            ),
            telemetry: TelemetryConfig::from_lookup(lookup, subtrack_core::resolver::QUERY_SERVICE),
        })
    }
}

/// Settings of the `all-in-one` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllInOneConfig {
    /// Creation-owned store.
    pub creation_database_url: String,
    /// Replica store.
    pub query_database_url: String,
    /// Creation Service listen address.
    pub creation_addr: SocketAddr,
    /// Read/Query Service listen address.
    pub query_addr: SocketAddr,
    /// Seed demo rows into an empty creation store.
    pub seed_demo_data: bool,
    /// Publish every stored row at startup.
    pub republish_on_startup: bool,
    /// Logging and spans.
    pub telemetry: TelemetryConfig,
}

impl AllInOneConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = text_or(lookup, "HOST", "0.0.0.0");
        Ok(Self {
            creation_database_url: required(lookup, "CREATION_DATABASE_URL")?,
            query_database_url: required(lookup, "QUERY_DATABASE_URL")?,
            creation_addr: bind_addr(&host, parse_or(lookup, "CREATION_PORT", DEFAULT_CREATION_PORT)?)?,
            query_addr: bind_addr(&host, parse_or(lookup, "QUERY_PORT", DEFAULT_QUERY_PORT)?)?,
            seed_demo_data: parse_or(lookup, "SEED_DEMO_DATA", false)?,
            republish_on_startup: parse_or(lookup, "REPUBLISH_ON_STARTUP", false)?,
            telemetry: TelemetryConfig::from_lookup(lookup, "subtrack-all-in-one"),
        })
    }
}

/// Settings of the `reconcile` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Creation-owned store.
    pub creation_database_url: String,
    /// Replica store.
    pub query_database_url: String,
    /// Logging and spans.
    pub telemetry: TelemetryConfig,
}

impl ReconcileConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            creation_database_url: required(lookup, "CREATION_DATABASE_URL")?,
            query_database_url: required(lookup, "QUERY_DATABASE_URL")?,
            telemetry: TelemetryConfig::from_lookup(lookup, "subtrack-reconcile"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_creation_defaults() {
        let config = CreationConfig::from_lookup(&env(&[("DATABASE_URL", "postgres://c")])).unwrap();

        assert_eq!(config.bind_addr.port(), DEFAULT_CREATION_PORT);
        assert_eq!(config.events.transport, EventTransport::Kafka);
        assert_eq!(config.events.topic, "subscription-created");
        assert!(!config.seed_demo_data);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.otlp_endpoint, None);
    }

    #[test]
    fn test_missing_database_url_is_a_config_error() {
        let result = QueryConfig::from_lookup(&env(&[]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = QueryConfig::from_lookup(&env(&[
            ("DATABASE_URL", "postgres://q"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_transport_and_flags_are_parsed() {
        let config = CreationConfig::from_lookup(&env(&[
            ("DATABASE_URL", "postgres://c"),
            ("EVENT_TRANSPORT", "NONE"),
            ("SEED_DEMO_DATA", "true"),
            ("REPUBLISH_ON_STARTUP", "true"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ]))
        .unwrap();

        assert_eq!(config.events.transport, EventTransport::None);
        assert!(config.seed_demo_data);
        assert!(config.republish_on_startup);
        assert_eq!(
            config.telemetry.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        let result = CreationConfig::from_lookup(&env(&[
            ("DATABASE_URL", "postgres://c"),
            ("EVENT_TRANSPORT", "carrier-pigeon"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_query_points_at_local_creation_service_by_default() {
        let config = QueryConfig::from_lookup(&env(&[("DATABASE_URL", "postgres://q")])).unwrap();
        assert_eq!(config.creation_service_url, "http://localhost:8081");
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_all_in_one_needs_both_databases() {
        let result = AllInOneConfig::from_lookup(&env(&[("CREATION_DATABASE_URL", "postgres://c")]));
        assert!(matches!(result, Err(AppError::Config(_))));

        let config = AllInOneConfig::from_lookup(&env(&[
            ("CREATION_DATABASE_URL", "postgres://c"),
            ("QUERY_DATABASE_URL", "postgres://q"),
            ("QUERY_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.query_addr.port(), 9000);
        assert_eq!(config.creation_addr.port(), DEFAULT_CREATION_PORT);
    }
}
