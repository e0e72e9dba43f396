//! # Hermes Chain
//!
//! Interceptor chain builder and executor for Hermes.
//!
//! This crate composes an ordered list of request interceptors
//! (authentication, locale negotiation, route guarding, whatever the
//! application supplies) into a single entry point the host invokes once
//! per inbound request.
//!
//! ## Execution model
//!
//! ```text
//! Request → [session] → [locale] → [route_guard] → ChainOutcome
//!               │           │
//!               └─ headers propagate forward; responses merge
//! ```
//!
//! Stages run strictly in declared order, one at a time. Each stage may
//! carry path patterns (AND semantics, anchored, compiled at build time);
//! a stage without patterns runs for every path. A stage that fails is
//! logged and skipped; one broken collaborator never fails the request.
//! If no stage intercepts, the outcome is an explicit
//! [`ChainOutcome::PassThrough`], telling the host to continue its own
//! handling.
//!
//! ## Example
//!
//! ```
//! use hermes_chain::{Chain, FnInterceptor, Request, Response, ResponseExt};
//! use hermes_core::ExecutionContext;
//! use http::StatusCode;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), hermes_core::HermesError> {
//! let chain = Chain::builder()
//!     .stage_matching(
//!         FnInterceptor::new("admin_gate", |_req: &Request, _ctx: &mut ExecutionContext| {
//!             async { Ok(Some(Response::error(StatusCode::FORBIDDEN, "admins only"))) }
//!         }),
//!         ["/admin(/.*)?"],
//!     )
//!     .build()?;
//!
//! let request = http::Request::builder()
//!     .uri("/admin/users")
//!     .body(http_body_util::Full::new(bytes::Bytes::new()))
//!     .unwrap();
//!
//! let outcome = chain.execute(request).await;
//! assert!(outcome.is_intercepted());
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-chain/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod interceptor;
pub mod matcher;
pub mod stages;
pub mod types;

// Re-export main types at crate root
pub use chain::{BoxedInterceptor, Chain, ChainBuilder, ChainOutcome, Stage};
pub use interceptor::{BoxFuture, FnInterceptor, InterceptResult, Interceptor};
pub use matcher::PathMatcher;
pub use types::{Request, Response, ResponseExt};
