//! Built-in chain stages.
//!
//! These stages cover the three concerns the standard chain assembles, in
//! its declared order:
//!
//! 1. [`session`] - Rolling session handling via an injected [`session::SessionClient`]
//! 2. [`locale`] - Locale prefix handling via an injected [`locale::LocaleResolver`]
//! 3. [`route_guard`] - Access-token gate for protected route patterns
//!
//! Each stage hosts a collaborator supplied by the application; none of them
//! implements authentication or locale negotiation itself. Collaborators
//! are constructed explicitly and passed in; there are no process-wide
//! client singletons.

pub mod locale;
pub mod route_guard;
pub mod session;

// Re-export main types
pub use locale::{FixedLocaleResolver, LocaleResolver, LocaleStage, ResolvedLocale};
pub use route_guard::RouteGuardStage;
pub use session::{
    AccessToken, ForceRefresh, SessionClient, SessionError, SessionResult, SessionStage,
    SessionTicket, SessionVerdict,
};
