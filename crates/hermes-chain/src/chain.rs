//! Chain builder and executor.
//!
//! A [`Chain`] composes an ordered list of interceptors into a single entry
//! point that the host invokes once per inbound request. Stage order is
//! fixed at build time: first declared is first executed, and later stages
//! observe the effects (propagated response headers) of earlier ones.
//!
//! ## Execution model
//!
//! ```text
//! Request → [stage 1] → [stage 2] → ... → [stage N] → ChainOutcome
//!              │            │
//!              └─ response ─┴─ merged (status/body latest, headers earliest-wins)
//! ```
//!
//! For each stage in order the executor:
//!
//! 1. skips the stage if its matcher rejects the current path;
//! 2. awaits the interceptor (stages never run concurrently within one
//!    invocation);
//! 3. on failure, logs and continues; one stage's failure never aborts the
//!    invocation;
//! 4. on a produced response, merges it into the accumulated response and
//!    propagates its headers onto a reconstructed request for the next
//!    stage.
//!
//! If no stage produced a response the outcome is
//! [`ChainOutcome::PassThrough`], an explicit sentinel telling the host to
//! continue its own default handling.

use crate::interceptor::Interceptor;
use crate::matcher::PathMatcher;
use crate::types::{Request, Response};
use hermes_core::{ExecutionContext, HermesResult};
use std::sync::Arc;

/// A type-erased interceptor that can be stored in the chain.
pub type BoxedInterceptor = Arc<dyn Interceptor>;

/// One (interceptor, matcher) pair in the chain.
///
/// Stages are immutable once the chain is built and are owned exclusively
/// by it.
pub struct Stage {
    interceptor: BoxedInterceptor,
    matcher: Option<PathMatcher>,
}

impl Stage {
    /// Returns the stage's name, taken from its interceptor.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.interceptor.name()
    }

    /// Returns `true` if this stage should run for the given path.
    ///
    /// A stage without a matcher runs for every path.
    fn matches(&self, path: &str) -> bool {
        self.matcher.as_ref().map_or(true, |m| m.matches(path))
    }
}

/// The result of one chain invocation.
///
/// `PassThrough` is deliberately a distinct variant rather than a sentinel
/// response value: "no stage intercepted" must never be confused with a
/// real empty `200`.
#[derive(Debug)]
pub enum ChainOutcome {
    /// At least one stage produced a response; this is the merged result the
    /// host should apply.
    Intercepted(Response),

    /// No stage intercepted; the host should continue normal processing.
    PassThrough,
}

impl ChainOutcome {
    /// Returns `true` if a stage intercepted the request.
    #[must_use]
    pub const fn is_intercepted(&self) -> bool {
        matches!(self, Self::Intercepted(_))
    }

    /// Returns `true` if no stage intercepted the request.
    #[must_use]
    pub const fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }

    /// Converts the outcome into the merged response, if any.
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Intercepted(response) => Some(response),
            Self::PassThrough => None,
        }
    }
}

/// An immutable, ordered interceptor chain.
///
/// A chain is built once at startup and is read-only afterwards, so it can
/// be shared freely across concurrent invocations; all per-request state
/// lives in the invocation itself.
///
/// # Example
///
/// ```
/// use hermes_chain::{Chain, FnInterceptor, Request};
/// use hermes_core::ExecutionContext;
///
/// # fn main() -> Result<(), hermes_core::HermesError> {
/// let chain = Chain::builder()
///     .stage(FnInterceptor::new("audit", |_req: &Request, _ctx: &mut ExecutionContext| {
///         async { Ok(None) }
///     }))
///     .build()?;
///
/// assert_eq!(chain.stage_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Chain {
    stages: Vec<Stage>,
}

impl Chain {
    /// Creates a new chain builder.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Executes the chain with a fresh [`ExecutionContext`].
    pub async fn execute(&self, request: Request) -> ChainOutcome {
        let mut ctx = ExecutionContext::new();
        self.execute_with(request, &mut ctx).await
    }

    /// Executes the chain with a host-supplied context.
    ///
    /// The context is handed opaquely to every interceptor in turn; the host
    /// can read back extensions stages recorded after the call returns.
    pub async fn execute_with(
        &self,
        request: Request,
        ctx: &mut ExecutionContext,
    ) -> ChainOutcome {
        let mut merged: Option<Response> = None;
        let mut active = request;

        for stage in &self.stages {
            if !stage.matches(active.uri().path()) {
                continue;
            }

            match stage.interceptor.intercept(&active, ctx).await {
                Ok(None) => {}
                Ok(Some(produced)) => {
                    active = propagate_headers(active, &produced);
                    merged = Some(match merged.take() {
                        None => produced,
                        Some(previous) => merge_responses(previous, produced),
                    });
                }
                Err(error) => {
                    // Total isolation: a failing stage degrades to a no-op.
                    tracing::error!(
                        request_id = %ctx.request_id(),
                        stage = stage.name(),
                        error = %error,
                        "stage failed; continuing with remaining stages"
                    );
                }
            }
        }

        merged.map_or(ChainOutcome::PassThrough, ChainOutcome::Intercepted)
    }

    /// Returns the names of all stages in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Merges an earlier accumulated response with a later produced one.
///
/// The later response is authoritative for status and body. Header names
/// already present in the earlier response keep the earlier values
/// (first-writer-wins per name, all values of that name); names only the
/// later response set are carried forward.
fn merge_responses(previous: Response, produced: Response) -> Response {
    let (previous_parts, _) = previous.into_parts();
    let (mut parts, body) = produced.into_parts();

    for name in previous_parts.headers.keys() {
        parts.headers.remove(name);
    }
    for (name, value) in &previous_parts.headers {
        parts.headers.append(name.clone(), value.clone());
    }

    Response::from_parts(parts, body)
}

/// Reconstructs the active request with the produced response's headers.
///
/// Method, URI, version and body are preserved; every header name the
/// response set replaces that name on the request, so later stages observe
/// cookies and headers set by earlier stages.
fn propagate_headers(request: Request, response: &Response) -> Request {
    let (mut parts, body) = request.into_parts();

    for name in response.headers().keys() {
        parts.headers.remove(name);
    }
    for (name, value) in response.headers() {
        parts.headers.append(name.clone(), value.clone());
    }

    Request::from_parts(parts, body)
}

/// Builder for constructing a [`Chain`].
///
/// Stages execute in the order they are added. Matcher patterns are stored
/// raw and compiled in [`build`](ChainBuilder::build), so every invalid
/// pattern surfaces as a fatal configuration error before any traffic is
/// served.
#[derive(Default)]
pub struct ChainBuilder {
    stages: Vec<(BoxedInterceptor, Option<Vec<String>>)>,
}

impl ChainBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Adds a stage that runs for every request path.
    #[must_use]
    pub fn stage<I: Interceptor>(mut self, interceptor: I) -> Self {
        self.stages.push((Arc::new(interceptor), None));
        self
    }

    /// Adds a stage that runs only when **all** patterns match the path.
    ///
    /// An empty pattern list behaves like [`stage`](Self::stage): it matches
    /// every path.
    #[must_use]
    pub fn stage_matching<I, P, S>(mut self, interceptor: I, patterns: P) -> Self
    where
        I: Interceptor,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns.into_iter().map(Into::into).collect();
        self.stages.push((Arc::new(interceptor), Some(patterns)));
        self
    }

    /// Builds the chain, compiling every matcher eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`hermes_core::HermesError::Configuration`] for the first
    /// pattern that fails to compile.
    pub fn build(self) -> HermesResult<Chain> {
        let mut stages = Vec::with_capacity(self.stages.len());
        for (interceptor, patterns) in self.stages {
            let matcher = match patterns {
                Some(patterns) => Some(PathMatcher::compile(patterns)?),
                None => None,
            };
            stages.push(Stage { interceptor, matcher });
        }
        Ok(Chain { stages })
    }
}
