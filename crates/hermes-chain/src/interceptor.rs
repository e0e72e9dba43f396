//! Core interceptor trait and types.
//!
//! This module defines the [`Interceptor`] trait that all chain stages
//! implement. An interceptor inspects the current request and either passes
//! (produces nothing), annotates or short-circuits (produces a response), or
//! fails with a typed [`StageError`].
//!
//! # Design Philosophy
//!
//! Interceptors do not call into the rest of the chain; they return a value
//! and the executor decides what happens next. Failures are data, not
//! control flow: a stage that cannot do its job returns `Err(StageError)`
//! and the executor's isolation policy degrades it to a no-op. An
//! interceptor must never encode "continue normally" as a response; that is
//! what `Ok(None)` is for.
//!
//! # Example
//!
//! ```
//! use hermes_chain::{BoxFuture, Interceptor, InterceptResult, Request};
//! use hermes_core::ExecutionContext;
//!
//! struct TraceInterceptor;
//!
//! impl Interceptor for TraceInterceptor {
//!     fn name(&self) -> &'static str {
//!         "trace"
//!     }
//!
//!     fn intercept<'a>(
//!         &'a self,
//!         request: &'a Request,
//!         ctx: &'a mut ExecutionContext,
//!     ) -> BoxFuture<'a, InterceptResult> {
//!         Box::pin(async move {
//!             tracing::debug!(request_id = %ctx.request_id(), path = request.uri().path(), "seen");
//!             Ok(None)
//!         })
//!     }
//! }
//! ```

use crate::types::{Request, Response};
use hermes_core::{ExecutionContext, StageError};
use std::future::Future;
use std::pin::Pin;

/// A boxed future returned by an interceptor.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What one interceptor invocation produced.
///
/// - `Ok(None)` - pass; the executor continues with the request unchanged.
/// - `Ok(Some(response))` - intercept; the executor merges the response and
///   propagates its headers to the next stage's request.
/// - `Err(error)` - failure; the executor logs it and treats the stage as a
///   no-op.
pub type InterceptResult = Result<Option<Response>, StageError>;

/// The core interceptor trait.
///
/// All chain stages implement this trait. An interceptor receives the
/// current request (possibly reconstructed from an earlier stage's response)
/// and the mutable per-invocation context.
///
/// # Invariants
///
/// - Interceptors run strictly one at a time within an invocation; the
///   executor awaits each call fully before starting the next.
/// - An interceptor MUST NOT assume it sees the inbound request verbatim:
///   earlier stages' response headers may have been propagated onto it.
pub trait Interceptor: Send + Sync + 'static {
    /// Returns the unique name of this stage.
    ///
    /// This name is used for logging and introspection.
    fn name(&self) -> &'static str;

    /// Processes the request through this interceptor.
    fn intercept<'a>(
        &'a self,
        request: &'a Request,
        ctx: &'a mut ExecutionContext,
    ) -> BoxFuture<'a, InterceptResult>;
}

/// An interceptor created from an async function.
///
/// This allows defining simple stages without implementing the trait
/// directly. The closure must not borrow from its arguments across an await
/// point; clone what the returned future needs.
///
/// # Example
///
/// ```
/// use hermes_chain::{Chain, FnInterceptor, Request};
/// use hermes_core::ExecutionContext;
///
/// # fn main() -> Result<(), hermes_core::HermesError> {
/// let chain = Chain::builder()
///     .stage(FnInterceptor::new(
///         "health",
///         |request: &Request, _ctx: &mut ExecutionContext| {
///             let hit = request.uri().path() == "/healthz";
///             async move {
///                 let _ = hit;
///                 Ok(None)
///             }
///         },
///     ))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FnInterceptor<F> {
    name: &'static str,
    func: F,
}

impl<F> FnInterceptor<F> {
    /// Creates a new function-based interceptor.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> Interceptor for FnInterceptor<F>
where
    F: Fn(&Request, &mut ExecutionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InterceptResult> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn intercept<'a>(
        &'a self,
        request: &'a Request,
        ctx: &'a mut ExecutionContext,
    ) -> BoxFuture<'a, InterceptResult> {
        Box::pin((self.func)(request, ctx))
    }
}
