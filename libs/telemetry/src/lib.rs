//! Lightweight helpers for Greentic telemetry.
//! Installs the tracing subscriber and records metric counters through the
//! `metrics` facade; an exporter can be plugged in by the hosting binary.

use anyhow::Result;

mod config;
mod context;
mod metrics;
mod tracing_init;

pub use config::TelemetryConfig;
pub use context::TelemetryLabels;
pub use self::metrics::{record_counter, with_common_fields};
pub use tracing_init::init_telemetry;

/// Installs the shared telemetry subscriber configured from `RUST_LOG` and `LOG_FORMAT`.
pub fn install(service_name: &str) -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env(service_name))
}
