//! # Hermes Config
//!
//! Typed configuration for the Hermes interceptor chain.
//!
//! Configuration is applied in layers (built-in defaults, then a TOML
//! file, then environment variables) and validated once at the end:
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hermes_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("hermes.toml")?
//!     .with_dotenv()?
//!     .with_env_prefix("HERMES")?
//!     .load()?;
//!
//! assert!(config.locale.locales.contains(&config.locale.default_locale));
//! # Ok(())
//! # }
//! ```
//!
//! Matcher pattern strings are carried as opaque data here; they compile
//! (and fail) where the chain is built.

#![doc(html_root_url = "https://docs.rs/hermes-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{GuardConfig, HermesConfig, LocaleConfig, SessionConfig, TelemetryConfig};
pub use error::ConfigError;
pub use loader::ConfigLoader;
