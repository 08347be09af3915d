//! Authentication Middleware
//! Mission: Gate protected routes on the session cookie

use crate::auth::error::AuthError;
use crate::auth::models::UserId;
use crate::auth::session::{SessionManager, SESSION_COOKIE};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

/// Identity resolved by `require_auth`, handed to every protected handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.0
    }
}

/// Resolve the `sess` cookie. Unauthenticated callers are redirected to
/// the login page and the inner handler never runs.
pub async fn require_auth(
    State(sessions): State<Arc<SessionManager>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Unauthenticated)?;

    let user_id = sessions.resolve_session(&token).map_err(|e| {
        if let AuthError::Unauthenticated = e {
            debug!("Rejected stale or unknown session for {}", req.uri().path());
        }
        e
    })?;

    req.extensions_mut().insert(CurrentUser(user_id));

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AuthError::Unauthenticated)
    }
}
