//! Subtrack API: the axum HTTP surface of the Creation Service and the
//! Read/Query Service, with configuration, telemetry, and the composition
//! roots the binaries run.

pub mod app;
pub mod config;
pub mod creation_client;
pub mod error;
pub mod routes;
pub mod runtime;
pub mod state;
pub mod telemetry;
