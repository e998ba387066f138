use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::validate_change_password;

pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let errors = validate_change_password(&body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    state
        .auth_service
        .change_password(&current.user_id, &body.current_password, &body.new_password)
        .await?;

    Ok(ApiSuccess::message_only(
        StatusCode::OK,
        "Password changed successfully",
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
