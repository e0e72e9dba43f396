//! Session stage.
//!
//! Hosts an injected [`SessionClient`], the identity provider's per-request
//! session handling (rolling refresh, auth routes). The stage owns none of
//! the session logic: it translates the collaborator's verdict into chain
//! terms.
//!
//! ## Verdicts
//!
//! - [`SessionVerdict::Untouched`] - nothing to do; the stage passes.
//! - [`SessionVerdict::Refreshed`] - the rolling session was extended; the
//!   stage synthesizes a response carrying the new `Set-Cookie` values so
//!   downstream stages (and ultimately the client) observe them.
//! - [`SessionVerdict::Respond`] - the collaborator produced a complete
//!   response (e.g. a login redirect for an auth route); forwarded as-is.
//!
//! ## Failure policy
//!
//! A [`SessionError::Decrypt`] (stale or tampered session cookie) is not an
//! exception to catch: it is a typed outcome the stage maps to a login
//! redirect carrying `returnTo`. Every other failure becomes a
//! [`StageError`] and is isolated by the executor.

use crate::interceptor::{BoxFuture, Interceptor, InterceptResult};
use crate::types::{Request, Response, ResponseExt};
use bytes::Bytes;
use hermes_core::{ExecutionContext, StageError};
use http::StatusCode;
use http_body_util::Full;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias using [`SessionError`].
pub type SessionResult<T> = Result<T, SessionError>;

/// Typed failures a session collaborator can report.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session cookie could not be decrypted (rotated secret, tampered
    /// or stale cookie). Mapped to a login redirect by the stages.
    #[error("session decryption failed")]
    Decrypt,

    /// The session store could not be reached.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// Any other failure, carried opaquely.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// An access token as reported by the session collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The raw bearer token.
    pub token: String,
    /// Expiry as Unix seconds.
    pub expires_at: u64,
}

/// Cookies to roll onto the response after a session refresh.
///
/// Each entry is a complete `Set-Cookie` value (name, value and attributes).
#[derive(Debug, Clone, Default)]
pub struct SessionTicket {
    /// Complete `Set-Cookie` header values.
    pub cookies: Vec<String>,
}

/// What the session collaborator decided for one request.
pub enum SessionVerdict {
    /// No session work was needed.
    Untouched,
    /// The rolling session was refreshed; cookies must reach the client.
    Refreshed(SessionTicket),
    /// Session handling produced a complete response.
    Respond(Response),
}

/// The session collaborator surface.
///
/// Implementations wrap an identity provider SDK. The trait is object-safe
/// so applications inject `Arc<dyn SessionClient>` into whichever stages
/// need it; the chain engine itself never sees this type.
pub trait SessionClient: Send + Sync + 'static {
    /// Runs the provider's per-request session handling.
    fn handle<'a>(&'a self, request: &'a Request)
        -> BoxFuture<'a, SessionResult<SessionVerdict>>;

    /// Returns the current access token, if a session is active.
    fn access_token<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, SessionResult<Option<AccessToken>>>;

    /// Marks the stored token set as expired so the next read refreshes it.
    fn expire_tokens<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, SessionResult<()>>;
}

/// Decorator adding forced token refresh to any [`SessionClient`].
///
/// The wrapped client is unchanged; the extra capability is composed from
/// the base surface (`expire_tokens` then `access_token`) rather than
/// grafted on through inheritance.
///
/// # Example
///
/// ```ignore
/// let client = ForceRefresh::new(provider_client);
/// let fresh = client.refresh_access_token(&request).await?;
/// ```
pub struct ForceRefresh<C> {
    inner: C,
}

impl<C: SessionClient> ForceRefresh<C> {
    /// Wraps a session client.
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Forces a token refresh: expires the stored token set, then reads the
    /// token back, which makes the provider mint a fresh one.
    pub async fn refresh_access_token(
        &self,
        request: &Request,
    ) -> SessionResult<Option<AccessToken>> {
        self.inner.expire_tokens(request).await?;
        self.inner.access_token(request).await
    }
}

impl<C: SessionClient> SessionClient for ForceRefresh<C> {
    fn handle<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, SessionResult<SessionVerdict>> {
        self.inner.handle(request)
    }

    fn access_token<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, SessionResult<Option<AccessToken>>> {
        self.inner.access_token(request)
    }

    fn expire_tokens<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, SessionResult<()>> {
        self.inner.expire_tokens(request)
    }
}

/// Builds a login redirect preserving where the user was headed.
///
/// `returnTo` carries the request's path and query, percent-encoded.
pub(crate) fn login_redirect(login_path: &str, request: &Request) -> Response {
    let return_to = match request.uri().query() {
        Some(query) => format!("{}?{}", request.uri().path(), query),
        None => request.uri().path().to_string(),
    };
    let location = format!("{login_path}?returnTo={}", urlencoding::encode(&return_to));
    Response::redirect(&location)
}

/// Chain stage hosting a [`SessionClient`].
///
/// Typically declared first and without a matcher, so every request gets
/// session handling before locale or guard decisions are made.
pub struct SessionStage {
    client: Arc<dyn SessionClient>,
    login_path: String,
}

impl SessionStage {
    /// Creates a session stage around an injected client.
    pub fn new(client: Arc<dyn SessionClient>, login_path: impl Into<String>) -> Self {
        Self {
            client,
            login_path: login_path.into(),
        }
    }

    fn refresh_response(ticket: &SessionTicket) -> Result<Response, StageError> {
        let mut response = http::Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::new()))
            .expect("failed to build refresh response");

        for cookie in &ticket.cookies {
            let value = http::HeaderValue::from_str(cookie)
                .map_err(|e| StageError::message(format!("invalid session cookie: {e}")))?;
            response.headers_mut().append(http::header::SET_COOKIE, value);
        }
        Ok(response)
    }
}

impl Interceptor for SessionStage {
    fn name(&self) -> &'static str {
        "session"
    }

    fn intercept<'a>(
        &'a self,
        request: &'a Request,
        _ctx: &'a mut ExecutionContext,
    ) -> BoxFuture<'a, InterceptResult> {
        Box::pin(async move {
            match self.client.handle(request).await {
                Ok(SessionVerdict::Untouched) => Ok(None),
                Ok(SessionVerdict::Refreshed(ticket)) => {
                    Ok(Some(Self::refresh_response(&ticket)?))
                }
                Ok(SessionVerdict::Respond(response)) => Ok(Some(response)),
                Err(SessionError::Decrypt) => {
                    Ok(Some(login_redirect(&self.login_path, request)))
                }
                Err(SessionError::Unavailable(message)) => {
                    Err(StageError::unavailable(message))
                }
                Err(SessionError::Other(error)) => Err(StageError::from(error)),
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use http::Request as HttpRequest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What a [`MockSessionClient`] should do per call.
    #[derive(Clone)]
    pub(crate) enum Script {
        Untouched,
        Refreshed(Vec<&'static str>),
        Respond(StatusCode),
        Token(&'static str),
        NoToken,
        Decrypt,
        Unavailable,
    }

    pub(crate) struct MockSessionClient {
        pub script: Script,
        pub expire_calls: AtomicUsize,
    }

    impl MockSessionClient {
        pub fn new(script: Script) -> Self {
            Self {
                script,
                expire_calls: AtomicUsize::new(0),
            }
        }
    }

    impl SessionClient for MockSessionClient {
        fn handle<'a>(
            &'a self,
            _request: &'a Request,
        ) -> BoxFuture<'a, SessionResult<SessionVerdict>> {
            Box::pin(async move {
                match &self.script {
                    Script::Untouched | Script::Token(_) | Script::NoToken => {
                        Ok(SessionVerdict::Untouched)
                    }
                    Script::Refreshed(cookies) => Ok(SessionVerdict::Refreshed(SessionTicket {
                        cookies: cookies.iter().map(ToString::to_string).collect(),
                    })),
                    Script::Respond(status) => Ok(SessionVerdict::Respond(
                        Response::error(*status, "from session client"),
                    )),
                    Script::Decrypt => Err(SessionError::Decrypt),
                    Script::Unavailable => {
                        Err(SessionError::Unavailable("store down".to_string()))
                    }
                }
            })
        }

        fn access_token<'a>(
            &'a self,
            _request: &'a Request,
        ) -> BoxFuture<'a, SessionResult<Option<AccessToken>>> {
            Box::pin(async move {
                match &self.script {
                    Script::Token(token) => Ok(Some(AccessToken {
                        token: (*token).to_string(),
                        expires_at: 4_102_444_800,
                    })),
                    Script::NoToken | Script::Untouched | Script::Refreshed(_)
                    | Script::Respond(_) => Ok(None),
                    Script::Decrypt => Err(SessionError::Decrypt),
                    Script::Unavailable => {
                        Err(SessionError::Unavailable("store down".to_string()))
                    }
                }
            })
        }

        fn expire_tokens<'a>(
            &'a self,
            _request: &'a Request,
        ) -> BoxFuture<'a, SessionResult<()>> {
            Box::pin(async move {
                self.expire_calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    pub(crate) fn request(path_and_query: &str) -> Request {
        HttpRequest::builder()
            .uri(path_and_query)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn stage(script: Script) -> SessionStage {
        SessionStage::new(Arc::new(MockSessionClient::new(script)), "/api/auth/login")
    }

    #[tokio::test]
    async fn untouched_session_passes() {
        let mut ctx = ExecutionContext::new();
        let result = stage(Script::Untouched)
            .intercept(&request("/en/profile"), &mut ctx)
            .await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn refreshed_session_sets_cookies() {
        let mut ctx = ExecutionContext::new();
        let result = stage(Script::Refreshed(vec!["s=1; Path=/; HttpOnly", "t=2"]))
            .intercept(&request("/en/profile"), &mut ctx)
            .await;

        let response = result.unwrap().expect("refresh should produce a response");
        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<_> = response
            .headers()
            .get_all(http::header::SET_COOKIE)
            .iter()
            .collect();
        assert_eq!(cookies, vec!["s=1; Path=/; HttpOnly", "t=2"]);
    }

    #[tokio::test]
    async fn collaborator_response_is_forwarded() {
        let mut ctx = ExecutionContext::new();
        let result = stage(Script::Respond(StatusCode::SEE_OTHER))
            .intercept(&request("/api/auth/callback"), &mut ctx)
            .await;

        let response = result.unwrap().expect("should forward the response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn decrypt_failure_redirects_to_login_with_return_to() {
        let mut ctx = ExecutionContext::new();
        let result = stage(Script::Decrypt)
            .intercept(&request("/en/profile?tab=tokens"), &mut ctx)
            .await;

        let response = result.unwrap().expect("decrypt should redirect");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = response
            .headers()
            .get(http::header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(
            location,
            "/api/auth/login?returnTo=%2Fen%2Fprofile%3Ftab%3Dtokens"
        );
    }

    #[tokio::test]
    async fn unavailable_store_is_a_stage_error() {
        let mut ctx = ExecutionContext::new();
        let result = stage(Script::Unavailable)
            .intercept(&request("/en/profile"), &mut ctx)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn force_refresh_expires_then_reads() {
        let client = ForceRefresh::new(MockSessionClient::new(Script::Token("abc")));
        let token = client
            .refresh_access_token(&request("/en/profile"))
            .await
            .unwrap()
            .expect("token should be present");

        assert_eq!(token.token, "abc");
        assert_eq!(client.inner.expire_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn force_refresh_delegates_the_base_surface() {
        let client = ForceRefresh::new(MockSessionClient::new(Script::Untouched));
        let verdict = client.handle(&request("/")).await.unwrap();
        assert!(matches!(verdict, SessionVerdict::Untouched));
        assert!(client.access_token(&request("/")).await.unwrap().is_none());
    }

    #[test]
    fn invalid_cookie_value_is_a_stage_error() {
        let ticket = SessionTicket {
            cookies: vec!["bad\ncookie".to_string()],
        };
        assert!(SessionStage::refresh_response(&ticket).is_err());
    }
}
