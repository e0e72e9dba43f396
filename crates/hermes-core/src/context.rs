//! Per-invocation context types.
//!
//! The [`ExecutionContext`] is the host-supplied object that flows through a
//! chain invocation. The executor treats it opaquely: it hands the same
//! context to every interceptor in turn and never inspects it beyond the
//! request id used for log correlation. Deadlines and cancellation belong to
//! the host; the context only carries them.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for each chain invocation, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use hermes_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {id}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    ///
    /// Useful when the ID was assigned by an upstream service.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Context that flows through one chain invocation.
///
/// Each invocation owns an independent context; nothing is shared across
/// concurrent invocations. Interceptors may enrich the context with typed
/// extensions (e.g. a resolved locale) that later stages or the host can
/// read back after the chain returns.
///
/// # Example
///
/// ```
/// use hermes_core::ExecutionContext;
///
/// #[derive(Debug, PartialEq)]
/// struct ResolvedTenant(String);
///
/// let mut ctx = ExecutionContext::new();
/// ctx.set_extension(ResolvedTenant("acme".to_string()));
///
/// assert_eq!(
///     ctx.get_extension::<ResolvedTenant>(),
///     Some(&ResolvedTenant("acme".to_string())),
/// );
/// ```
#[derive(Debug)]
pub struct ExecutionContext {
    /// Unique identifier for this invocation.
    request_id: RequestId,

    /// When the invocation started.
    started_at: Instant,

    /// Host-imposed deadline, if any. The executor does not enforce it;
    /// interceptors may consult it.
    deadline: Option<Instant>,

    /// Type-erased extension data stored by interceptors.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ExecutionContext {
    /// Creates a new context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            deadline: None,
            extensions: HashMap::new(),
        }
    }

    /// Attaches a host deadline to the context.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the host deadline, if one was supplied.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns when the invocation started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the invocation started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    ///
    /// Extensions let a stage leave information for later stages or for the
    /// host. Storing a second value of the same type replaces the first.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
