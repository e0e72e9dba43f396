//! Route guard stage.
//!
//! Gates protected routes on the presence of an access token, consulting the
//! same injected [`SessionClient`] the session stage uses. The stage itself
//! never validates tokens; presence is the collaborator's answer.
//!
//! Which routes are protected is declared where the chain is assembled, as
//! matcher patterns on this stage (e.g. `/(en|th)/dashboard`), not inside
//! the stage.
//!
//! A missing token or an undecryptable session redirects to login with
//! `returnTo`. Any other collaborator failure is a [`StageError`]: the
//! executor degrades the guard to a no-op, favoring availability over
//! strictness. Hosts that need a fail-closed guard must map collaborator
//! errors to a redirect in their own interceptor.

use crate::interceptor::{BoxFuture, Interceptor, InterceptResult};
use crate::stages::session::{login_redirect, SessionClient, SessionError};
use crate::types::Request;
use hermes_core::{ExecutionContext, StageError};
use std::sync::Arc;

/// Chain stage that requires an active access token.
pub struct RouteGuardStage {
    client: Arc<dyn SessionClient>,
    login_path: String,
}

impl RouteGuardStage {
    /// Creates a guard around an injected session client.
    pub fn new(client: Arc<dyn SessionClient>, login_path: impl Into<String>) -> Self {
        Self {
            client,
            login_path: login_path.into(),
        }
    }
}

impl Interceptor for RouteGuardStage {
    fn name(&self) -> &'static str {
        "route_guard"
    }

    fn intercept<'a>(
        &'a self,
        request: &'a Request,
        _ctx: &'a mut ExecutionContext,
    ) -> BoxFuture<'a, InterceptResult> {
        Box::pin(async move {
            match self.client.access_token(request).await {
                Ok(Some(_)) => Ok(None),
                Ok(None) | Err(SessionError::Decrypt) => {
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
