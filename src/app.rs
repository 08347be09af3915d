//! Application Wiring
//! Mission: Build every component from explicit config and one database handle

use crate::api::{self, AppState};
use crate::auth::{
    api as auth_api, bootstrap_admin, require_auth, AuthResult, AuthState, BootstrapOutcome,
    Registration, SessionManager, UserStore,
};
use crate::config::Config;
use crate::db::Database;
use crate::watches::{SettingsStore, WatchStore};
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// The assembled service. Cheap to clone.
#[derive(Clone)]
pub struct App {
    pub auth: AuthState,
    pub state: AppState,
    admin_user: Option<String>,
    admin_pass: Option<String>,
}

impl App {
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let users = Arc::new(
            UserStore::with_cost(db.clone(), config.bcrypt_cost)
                .context("Failed to initialize user store")?,
        );
        let sessions = Arc::new(
            SessionManager::new(db.clone()).with_secure_cookie(config.cookie_secure),
        );
        let registration = Arc::new(Registration::new(
            config.allow_signup,
            users.clone(),
            sessions.clone(),
        ));

        let auth = AuthState {
            users: users.clone(),
            sessions,
            registration,
            cookie_secret: Arc::from(config.cookie_secret.as_str()),
        };

        let state = AppState {
            users,
            watches: Arc::new(WatchStore::new(db.clone())),
            settings: Arc::new(SettingsStore::new(db)),
        };

        Ok(Self {
            auth,
            state,
            admin_user: config.admin_user.clone(),
            admin_pass: config.admin_pass.clone(),
        })
    }

    /// Create the configured admin when no accounts exist yet
    pub fn bootstrap(&self) -> AuthResult<BootstrapOutcome> {
        bootstrap_admin(
            &self.auth.users,
            self.admin_user.as_deref(),
            self.admin_pass.as_deref(),
        )
    }

    pub fn router(&self) -> Router {
        // Public auth routes
        let auth_router = Router::new()
            .route("/login", get(auth_api::login_page).post(auth_api::login))
            .route("/logout", get(auth_api::logout).post(auth_api::logout))
            .route("/signup", get(auth_api::signup_page).post(auth_api::signup))
            .with_state(self.auth.clone());

        // Everything else requires a live session
        let protected_routes = Router::new()
            .route("/", get(api::dashboard))
            .route("/watch/add", post(api::add_watch))
            .route("/watch/delete", post(api::delete_watch))
            .route("/telegram", get(api::get_settings))
            .route("/telegram/save", post(api::save_settings))
            .route_layer(middleware::from_fn_with_state(
                self.auth.sessions.clone(),
                require_auth,
            ))
            .with_state(self.state.clone());

        let public_routes = Router::new().route("/health", get(health_check));

        Router::new()
            .merge(public_routes)
            .merge(protected_routes)
            .merge(auth_router)
            .layer(TraceLayer::new_for_http())
    }
}

async fn health_check() -> &'static str {
    "ok"
}
