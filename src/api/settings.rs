//! Notification settings handlers

use crate::api::{ApiError, AppState};
use crate::auth::{error::found, CurrentUser};
use crate::watches::models::{Settings, SettingsForm};
use axum::{extract::State, response::Response, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Settings page data
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsView {
    pub token: String,
    pub chat_id: String,
}

/// Settings - GET /telegram
pub async fn get_settings(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<SettingsView>, ApiError> {
    let settings = state.settings.get()?;
    Ok(Json(SettingsView {
        token: settings.tg_token,
        chat_id: settings.tg_chat_id,
    }))
}

/// Save settings - POST /telegram/save
pub async fn save_settings(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<SettingsForm>,
) -> Result<Response, ApiError> {
    let settings = Settings::from(form);
    state.settings.save(&settings)?;
    info!("🔔 Notification settings updated by user {}", user.id());
    Ok(found("/telegram"))
}
