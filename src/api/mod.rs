//! Protected Watch-list API
//! Mission: Dashboard, watch CRUD and notification settings behind the session gate

pub mod settings;
pub mod watches;

use crate::auth::{AuthError, UserStore};
use crate::watches::{SettingsStore, WatchStore};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

pub use settings::{get_settings, save_settings, SettingsView};
pub use watches::{add_watch, dashboard, delete_watch, DashboardView};

/// State for the protected routes
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub watches: Arc<WatchStore>,
    pub settings: Arc<SettingsStore>,
}

/// Errors from the protected handlers
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Storage(anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(e) => e.into_response(),
            ApiError::Storage(e) => {
                error!("Storage failure: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_hides_detail() {
        let resp = ApiError::Storage(anyhow::anyhow!("disk I/O error at /data/app.db")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_error_passthrough() {
        let resp = ApiError::from(AuthError::Unauthenticated).into_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
    }
}
