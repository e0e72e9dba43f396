//! Standard chain assembly.
//!
//! The composition root for the common deployment: session handling on
//! every path, locale prefixing on page paths, and an access-token guard on
//! the configured protected routes. Collaborators are injected here: the
//! application constructs its identity client and locale negotiator and
//! hands them in; nothing in the chain reaches for a global.

use hermes_chain::stages::locale::{LocaleResolver, LocaleStage};
use hermes_chain::stages::route_guard::RouteGuardStage;
use hermes_chain::stages::session::{SessionClient, SessionStage};
use hermes_chain::Chain;
use hermes_config::HermesConfig;
use hermes_core::HermesResult;
use hermes_telemetry::LogConfig;
use std::sync::Arc;

/// Builds the standard session → locale → route-guard chain.
///
/// Stage order is significant and fixed: the session stage runs first so a
/// refreshed session cookie is visible to every later stage, the locale
/// stage localizes page paths, and the guard checks only the configured
/// protected patterns.
///
/// # Errors
///
/// Returns a fatal [`hermes_core::HermesError::Configuration`] if any
/// configured guard pattern fails to compile.
///
/// # Example
///
/// ```ignore
/// let config = ConfigLoader::new().with_env_prefix("HERMES")?.load()?;
/// let sessions: Arc<dyn SessionClient> = Arc::new(ProviderClient::new(creds));
/// let chain = standard_chain(&config, sessions, Arc::new(FixedLocaleResolver))?;
///
/// // Per request:
/// let outcome = chain.execute(request).await;
/// ```
pub fn standard_chain(
    config: &HermesConfig,
    sessions: Arc<dyn SessionClient>,
    locales: Arc<dyn LocaleResolver>,
) -> HermesResult<Chain> {
    Chain::builder()
        .stage(SessionStage::new(
            sessions.clone(),
            config.session.login_path.clone(),
        ))
        .stage(
            LocaleStage::new(
                locales,
                config.locale.locales.clone(),
                config.locale.default_locale.clone(),
            )
            .with_skip_prefixes(config.locale.skip_prefixes.clone()),
        )
        .stage_matching(
            RouteGuardStage::new(sessions, config.session.login_path.clone()),
            config.guard.protected.clone(),
        )
        .build()
}

/// Maps the deployment's telemetry section onto a logging config.
#[must_use]
pub fn log_config(config: &HermesConfig) -> LogConfig {
    LogConfig {
        level: config.telemetry.level.clone(),
        json_format: config.telemetry.json,
        ..LogConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use hermes_chain::stages::session::{AccessToken, SessionResult, SessionVerdict};
    use hermes_chain::stages::locale::FixedLocaleResolver;
    use hermes_chain::{BoxFuture, Request};
    use http::StatusCode;
    use http_body_util::Full;

    /// A collaborator with no session and no token.
    struct AnonymousSessions;

    impl SessionClient for AnonymousSessions {
        fn handle<'a>(
            &'a self,
            _request: &'a Request,
        ) -> BoxFuture<'a, SessionResult<SessionVerdict>> {
            Box::pin(async { Ok(SessionVerdict::Untouched) })
        }

        fn access_token<'a>(
            &'a self,
            _request: &'a Request,
        ) -> BoxFuture<'a, SessionResult<Option<AccessToken>>> {
            Box::pin(async { Ok(None) })
        }

        fn expire_tokens<'a>(
            &'a self,
            _request: &'a Request,
        ) -> BoxFuture<'a, SessionResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn make_request(path: &str) -> Request {
        http::Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn default_config_assembles_three_stages() {
        let chain = standard_chain(
            &HermesConfig::default(),
            Arc::new(AnonymousSessions),
            Arc::new(FixedLocaleResolver),
        )
        .unwrap();

        assert_eq!(chain.stage_names(), vec!["session", "locale", "route_guard"]);
    }

    #[tokio::test]
    async fn default_chain_guards_the_dashboard() {
        let chain = standard_chain(
            &HermesConfig::default(),
            Arc::new(AnonymousSessions),
            Arc::new(FixedLocaleResolver),
        )
        .unwrap();

        let response = chain
            .execute(make_request("/en/dashboard"))
            .await
            .into_response()
            .expect("anonymous dashboard request should redirect");

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/api/auth/login?returnTo=%2Fen%2Fdashboard"
        );
    }

    #[tokio::test]
    async fn default_chain_localizes_bare_paths() {
        let chain = standard_chain(
            &HermesConfig::default(),
            Arc::new(AnonymousSessions),
            Arc::new(FixedLocaleResolver),
        )
        .unwrap();

        let response = chain
            .execute(make_request("/profile"))
            .await
            .into_response()
            .expect("bare path should be localized");
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/en/profile"
        );
    }

    #[test]
    fn bad_guard_pattern_fails_assembly() {
        let mut config = HermesConfig::default();
        config.guard.protected = vec!["/((?!auth|api).*)".to_string()];

        let result = standard_chain(
            &config,
            Arc::new(AnonymousSessions),
            Arc::new(FixedLocaleResolver),
        );
        assert!(result.err().is_some_and(|e| e.is_fatal()));
    }

    #[test]
    fn log_config_follows_the_telemetry_section() {
        let mut config = HermesConfig::default();
        config.telemetry.level = "hermes=debug".to_string();
        config.telemetry.json = false;

        let log = log_config(&config);
        assert_eq!(log.level, "hermes=debug");
        assert!(!log.json_format);
    }
}
