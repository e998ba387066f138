use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::validate_login;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let errors = validate_login(&body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let (user, token) = state
        .auth_service
        .login(&body.email, &body.password)
        .await?;

    Ok(ApiSuccess::with_message(
        StatusCode::OK,
        "Login successful",
        AuthResponseData {
            user: (&user).into(),
            token,
        },
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
