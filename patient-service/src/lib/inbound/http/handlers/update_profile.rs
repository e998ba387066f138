use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::AddressInput;
use super::ApiError;
use super::ApiSuccess;
use super::EmergencyContactInput;
use super::MedicalProfileInput;
use super::ParseBodyError;
use super::ProfileUserData;
use super::UserData;
use crate::domain::user::models::UpdateProfileCommand;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::validate_update_profile;

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData<ProfileUserData>>, ApiError> {
    let errors = validate_update_profile(&body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let command = body.try_into_command()?;
    let user = state
        .auth_service
        .update_profile(&current.user_id, command)
        .await?;

    Ok(ApiSuccess::with_message(
        StatusCode::OK,
        "Profile updated successfully",
        UserData { user: (&user).into() },
    ))
}

/// Partial update: absent keys leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<AddressInput>,
    pub emergency_contact: Option<EmergencyContactInput>,
    pub medical_profile: Option<MedicalProfileInput>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, ParseBodyError> {
        let medical_profile = self
            .medical_profile
            .map(MedicalProfileInput::into_domain)
            .transpose()?;

        Ok(UpdateProfileCommand {
            first_name: self.first_name.map(|s| s.trim().to_string()),
            last_name: self.last_name.map(|s| s.trim().to_string()),
            phone_number: self.phone_number,
            address: self.address.map(AddressInput::into_domain),
            emergency_contact: self.emergency_contact.map(EmergencyContactInput::into_domain),
            medical_profile,
        })
    }
}
