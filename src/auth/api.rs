//! Authentication Endpoints
//! Mission: Login, logout and signup over form posts and the session cookie

use crate::auth::{
    error::{found, AuthError, AuthResult},
    models::{CredentialsForm, IssuedSession, LoginView},
    registration::Registration,
    session::{SessionManager, SESSION_COOKIE},
    user_store::UserStore,
};
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionManager>,
    pub registration: Arc<Registration>,

    // Reserved for cookie signing; sessions are server-side lookups today.
    pub cookie_secret: Arc<str>,
}

/// Run bcrypt-bound work off the async workers
async fn blocking<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

fn logged_in(state: &AuthState, jar: CookieJar, issued: &IssuedSession) -> Response {
    (jar.add(state.sessions.session_cookie(issued)), found("/")).into_response()
}

/// Login page data - GET /login
pub async fn login_page(State(state): State<AuthState>) -> Json<LoginView> {
    Json(LoginView {
        signup_enabled: state.registration.enabled(),
        ..Default::default()
    })
}

/// Login - POST /login
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let username = form.username.clone();

    let users = state.users.clone();
    let sessions = state.sessions.clone();
    let result = blocking(move || {
        let user_id = users.verify_credentials(&form.username, &form.password)?;
        sessions.create_session(user_id)
    })
    .await;

    match result {
        Ok(issued) => {
            info!("✅ Login successful: {} (id {})", username, issued.user_id);
            logged_in(&state, jar, &issued)
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("❌ Failed login attempt: {}", username);
            let view = LoginView {
                signup_enabled: state.registration.enabled(),
                show_signup: false,
                error: Some(AuthError::InvalidCredentials.public_message().to_string()),
            };
            (StatusCode::UNAUTHORIZED, Json(view)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Logout - GET|POST /logout
pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response, AuthError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke_session(cookie.value())?;
    }

    let jar = jar.remove(state.sessions.removal_cookie());
    Ok((jar, found("/login")).into_response())
}

/// Signup page data - GET /signup
pub async fn signup_page(State(state): State<AuthState>) -> Result<Json<LoginView>, AuthError> {
    state.registration.ensure_enabled()?;
    Ok(Json(LoginView {
        signup_enabled: true,
        show_signup: true,
        error: None,
    }))
}

/// Signup - POST /signup
///
/// The body is only inspected once signup is known to be enabled.
pub async fn signup(
    State(state): State<AuthState>,
    jar: CookieJar,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Response {
    if let Err(e) = state.registration.ensure_enabled() {
        return e.into_response();
    }
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };

    let registration = state.registration.clone();
    let result = blocking(move || registration.register(&form.username, &form.password)).await;

    match result {
        Ok(issued) => logged_in(&state, jar, &issued),
        Err(e @ (AuthError::ValidationFailed(_) | AuthError::DuplicateUsername)) => {
            let view = LoginView {
                signup_enabled: true,
                show_signup: true,
                error: Some(e.public_message().to_string()),
            };
            (e.status(), Json(view)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
