//! # Hermes Telemetry
//!
//! Structured logging for Hermes chain deployments.
//!
//! The chain engine reports every stage failure through `tracing`; this
//! crate installs the subscriber that turns those events into JSON (or
//! pretty, for development) log lines.
//!
//! Metrics and distributed tracing exporters are intentionally absent: the
//! chain is an in-process library and its hosts own their own exporters.
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_telemetry::{logging::init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
