//! Logging and metrics for Heron.
//!
//! - **Logging**: installs a `tracing-subscriber` stack with JSON or pretty
//!   output. See [`logging`].
//! - **Metrics**: counters and histograms for registration, binding and
//!   invocation, recorded through the `metrics` facade. See [`metrics`].
//!
//! # Example
//!
//! ```rust,ignore
//! use heron_telemetry::{init_logging, metrics, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! metrics::describe_metrics();
//! ```

#![doc(html_root_url = "https://docs.rs/heron-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
