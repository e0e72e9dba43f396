//! Error types for Hermes.
//!
//! The taxonomy is deliberately small and mirrors how the two failure classes
//! are handled:
//!
//! - [`HermesError::Configuration`] is fatal. It surfaces when a chain is
//!   built from an invalid matcher pattern, before any traffic is served.
//! - [`HermesError::StageExecution`] is recoverable. The executor logs it and
//!   treats the failing stage as a no-op; it never reaches the host or the
//!   client.
//!
//! A chain invocation where no stage intercepts is not an error at all; it
//! is the `PassThrough` outcome in `hermes-chain`.

use thiserror::Error;

/// Result type alias using [`HermesError`].
pub type HermesResult<T> = Result<T, HermesError>;

/// Standard error type for Hermes.
///
/// # Example
///
/// ```
/// use hermes_core::HermesError;
///
/// let error = HermesError::configuration("/[broken", "unclosed character class");
/// assert!(error.is_fatal());
/// ```
#[derive(Error, Debug)]
pub enum HermesError {
    /// A matcher pattern failed to compile at build time.
    ///
    /// Patterns are compiled eagerly when the chain is built, so this error
    /// fails deployment rather than individual requests.
    #[error("invalid matcher pattern `{pattern}`: {reason}")]
    Configuration {
        /// The pattern string that failed to compile.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },

    /// An interceptor failed while processing a request.
    ///
    /// The executor recovers from this locally; it is surfaced only through
    /// logs and is never returned to the host.
    #[error("stage `{stage}` failed: {source}")]
    StageExecution {
        /// Name of the failing stage.
        stage: &'static str,
        /// The typed failure the interceptor returned.
        #[source]
        source: StageError,
    },
}

impl HermesError {
    /// Creates a configuration error for a pattern that failed to compile.
    #[must_use]
    pub fn configuration(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates a stage execution error for the named stage.
    #[must_use]
    pub fn stage(stage: &'static str, source: StageError) -> Self {
        Self::StageExecution { stage, source }
    }

    /// Returns `true` if this error should abort startup.
    ///
    /// Configuration errors are fatal; stage execution errors degrade the
    /// failing stage to a no-op instead.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Typed failure returned by an interceptor.
///
/// Interceptors return `Result<Option<Response>, StageError>` instead of
/// panicking or encoding failures as responses. The executor's isolation
/// policy turns any `StageError` into a logged no-op, so a misbehaving
/// collaborator degrades gracefully rather than failing the request.
#[derive(Error, Debug)]
pub enum StageError {
    /// A downstream collaborator could not be reached or answered abnormally.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// Any other failure, carried opaquely.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Creates an unavailable-collaborator error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates an opaque stage error from a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Other(anyhow::anyhow!(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_is_fatal() {
        let error = HermesError::configuration("/((?!auth).*)", "look-around is not supported");
        assert!(error.is_fatal());
        assert!(error.to_string().contains("/((?!auth).*)"));
    }

    #[test]
    fn stage_error_is_not_fatal() {
        let error = HermesError::stage("session", StageError::unavailable("store timed out"));
        assert!(!error.is_fatal());
        assert!(error.to_string().contains("session"));
    }

    #[test]
    fn stage_error_chains_source() {
        let error = HermesError::stage("locale", StageError::message("resolver crashed"));
        let source = std::error::Error::source(&error).expect("source should be set");
        assert!(source.to_string().contains("resolver crashed"));
    }

    #[test]
    fn stage_error_from_anyhow() {
        let inner = anyhow::anyhow!("boom");
        let error = StageError::from(inner);
        assert!(matches!(error, StageError::Other(_)));
    }
}
