//! Locale stage.
//!
//! Ensures every page path carries a supported locale prefix (`/en/...`,
//! `/th/...`). The negotiation itself, which locale a prefix-less request
//! should get, belongs to an injected [`LocaleResolver`]; the stage only
//! applies its answer:
//!
//! - prefixed path → record the [`ResolvedLocale`] extension and pass;
//! - prefix-less path → 307 redirect to the locale-prefixed path, query
//!   string preserved, locale cookie set.
//!
//! Paths under the configured skip prefixes (auth and API routes by
//! default) are never localized.

use crate::interceptor::{BoxFuture, Interceptor, InterceptResult};
use crate::types::{Request, Response, ResponseExt};
use hermes_core::{ExecutionContext, StageError};
use std::sync::Arc;

/// Cookie recording the locale a redirect chose.
pub const LOCALE_COOKIE: &str = "locale";

/// Context extension recording the locale a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    /// The locale tag (e.g. `en`).
    pub tag: String,
}

/// Picks a locale tag for a prefix-less request.
///
/// Implementations may inspect cookies or `Accept-Language`, or consult a
/// user profile. The stage clamps the answer to the supported set, falling
/// back to the default tag.
pub trait LocaleResolver: Send + Sync + 'static {
    /// Returns the preferred tag for this request out of `supported`.
    fn negotiate<'a>(
        &'a self,
        request: &'a Request,
        supported: &'a [String],
        fallback: &'a str,
    ) -> BoxFuture<'a, String>;
}

/// Resolver that always answers with the fallback tag.
///
/// Useful as a deployment default and in tests; real negotiation is the
/// application's collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocaleResolver;

impl LocaleResolver for FixedLocaleResolver {
    fn negotiate<'a>(
        &'a self,
        _request: &'a Request,
        _supported: &'a [String],
        fallback: &'a str,
    ) -> BoxFuture<'a, String> {
        let tag = fallback.to_string();
        Box::pin(async move { tag })
    }
}

/// Chain stage hosting a [`LocaleResolver`].
pub struct LocaleStage {
    resolver: Arc<dyn LocaleResolver>,
    locales: Vec<String>,
    default_locale: String,
    skip_prefixes: Vec<String>,
}

impl LocaleStage {
    /// Creates a locale stage for the supported tags.
    ///
    /// Skip prefixes default to `/auth` and `/api`.
    pub fn new(
        resolver: Arc<dyn LocaleResolver>,
        locales: Vec<String>,
        default_locale: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            locales,
            default_locale: default_locale.into(),
            skip_prefixes: vec!["/auth".to_string(), "/api".to_string()],
        }
    }

    /// Replaces the skip prefixes.
    #[must_use]
    pub fn with_skip_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.skip_prefixes = prefixes;
        self
    }

    /// Returns the supported locale tag the path is prefixed with, if any.
    fn path_locale<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix('/')?;
        let tag = rest.split('/').next().unwrap_or(rest);
        self.locales
            .iter()
            .any(|supported| supported == tag)
            .then_some(tag)
    }

    /// Returns `true` for paths that are never localized.
    ///
    /// Prefixes match whole segments: `/api` skips `/api` and `/api/auth`
    /// but not `/apidocs`.
    fn should_skip(&self, path: &str) -> bool {
        self.skip_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    fn redirect_to_locale(&self, tag: &str, request: &Request) -> Result<Response, StageError> {
        let path = request.uri().path();
        let prefixed = if path == "/" {
            format!("/{tag}")
        } else {
            format!("/{tag}{path}")
        };
        let target = match request.uri().query() {
            Some(query) => format!("{prefixed}?{query}"),
            None => prefixed,
        };

        let mut response = Response::redirect(&target);
        let cookie = format!("{LOCALE_COOKIE}={tag}; Path=/");
        let value = http::HeaderValue::from_str(&cookie)
            .map_err(|e| StageError::message(format!("invalid locale cookie: {e}")))?;
        response.headers_mut().append(http::header::SET_COOKIE, value);
        Ok(response)
    }
}

impl Interceptor for LocaleStage {
    fn name(&self) -> &'static str {
        "locale"
    }

    fn intercept<'a>(
        &'a self,
        request: &'a Request,
        ctx: &'a mut ExecutionContext,
    ) -> BoxFuture<'a, InterceptResult> {
        Box::pin(async move {
            let path = request.uri().path();
            if self.should_skip(path) {
                return Ok(None);
            }

            if let Some(tag) = self.path_locale(path) {
                ctx.set_extension(ResolvedLocale {
                    tag: tag.to_string(),
                });
                return Ok(None);
            }

            let answer = self
                .resolver
                .negotiate(request, &self.locales, &self.default_locale)
                .await;
            // Clamp untrusted resolver output to the supported set.
            let tag = if self.locales.contains(&answer) {
                answer
            } else {
                self.default_locale.clone()
            };

            ctx.set_extension(ResolvedLocale { tag: tag.clone() });
            Ok(Some(self.redirect_to_locale(&tag, request)?))
        })
    }
}
