//! Dashboard and watch CRUD handlers

use crate::api::{ApiError, AppState};
use crate::auth::{error::found, models::UserResponse, AuthError, CurrentUser};
use crate::watches::models::{DeleteWatchForm, Watch, WatchForm};
use axum::{extract::State, response::Response, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dashboard page data
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub user: UserResponse,
    pub watches: Vec<Watch>,
}

/// Dashboard - GET /
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardView>, ApiError> {
    // Sessions reference users loosely; a missing row means the account is gone.
    let account = state
        .users
        .get_user(user.id())?
        .ok_or(AuthError::Unauthenticated)?;

    let watches = state.watches.list()?;

    Ok(Json(DashboardView {
        user: UserResponse::from_user(&account),
        watches,
    }))
}

/// Add watch - POST /watch/add
pub async fn add_watch(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<WatchForm>,
) -> Result<Response, ApiError> {
    match form.into_new_watch() {
        Some(watch) => {
            state.watches.add(&watch)?;
        }
        None => debug!("User {} submitted a watch without url or model", user.id()),
    }
    Ok(found("/"))
}

/// Delete watch - POST /watch/delete
pub async fn delete_watch(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<DeleteWatchForm>,
) -> Result<Response, ApiError> {
    if let Some(id) = form.watch_id() {
        debug!("User {} deleting watch {}", user.id(), id);
        state.watches.delete(id)?;
    }
    Ok(found("/"))
}
