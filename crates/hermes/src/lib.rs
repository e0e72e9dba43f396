//! # Hermes
//!
//! **Request interceptor chaining engine**
//!
//! Hermes composes independent request interceptors (session handling,
//! locale negotiation, route guarding) into one pipeline entry point a
//! host HTTP layer invokes once per inbound request:
//!
//! - **Declared order** – first declared is first executed; later stages
//!   observe headers earlier stages set
//! - **Per-stage matchers** – anchored path patterns with AND semantics,
//!   compiled at build time
//! - **Failure isolation** – a broken stage degrades to a logged no-op,
//!   never a failed request
//! - **Explicit pass-through** – "nothing intercepted" is a distinct
//!   outcome, not a sentinel response
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ConfigLoader::new().with_env_prefix("HERMES")?.load()?;
//! init_logging(&hermes::standard::log_config(&config))?;
//!
//! let sessions: Arc<dyn SessionClient> = Arc::new(MyProviderClient::new(creds));
//! let chain = standard_chain(&config, sessions, Arc::new(FixedLocaleResolver))?;
//!
//! // Per request, from the host HTTP layer:
//! match chain.execute(request).await {
//!     ChainOutcome::Intercepted(response) => apply(response),
//!     ChainOutcome::PassThrough => continue_normally(),
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → [session] → [locale] → [route_guard] → ChainOutcome
//!               │           │
//!               └─ headers propagate forward; responses merge
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use hermes_core as core;

// Re-export chain types
pub use hermes_chain as chain;

// Re-export configuration types
pub use hermes_config as config;

// Re-export telemetry types
pub use hermes_telemetry as telemetry;

pub mod standard;

pub use standard::{log_config, standard_chain};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use crate::standard::{log_config, standard_chain};
    pub use hermes_chain::stages::locale::{
        FixedLocaleResolver, LocaleResolver, LocaleStage, ResolvedLocale,
    };
    pub use hermes_chain::stages::route_guard::RouteGuardStage;
    pub use hermes_chain::stages::session::{
        AccessToken, ForceRefresh, SessionClient, SessionError, SessionStage, SessionTicket,
        SessionVerdict,
    };
    pub use hermes_chain::{
        Chain, ChainBuilder, ChainOutcome, FnInterceptor, InterceptResult, Interceptor,
        PathMatcher, Request, Response, ResponseExt,
    };
    pub use hermes_config::{ConfigLoader, HermesConfig};
    pub use hermes_core::{ExecutionContext, HermesError, HermesResult, RequestId, StageError};
    pub use hermes_telemetry::{init_logging, LogConfig};
}
