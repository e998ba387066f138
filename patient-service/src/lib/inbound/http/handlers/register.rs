use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::AddressInput;
use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use super::EmergencyContactInput;
use super::MedicalProfileInput;
use super::ParseBodyError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::parse_iso_date;
use crate::inbound::http::validation::validate_register;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let errors = validate_register(&body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let command = body.try_into_command()?;
    let (user, token) = state.auth_service.register(command).await?;

    Ok(ApiSuccess::with_message(
        StatusCode::CREATED,
        "User registered successfully",
        AuthResponseData {
            user: (&user).into(),
            token,
        },
    ))
}

/// HTTP request body for registration (raw JSON). Every field is defaulted
/// so missing keys surface as validation errors, not deserialization 4xx.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub address: Option<AddressInput>,
    pub emergency_contact: Option<EmergencyContactInput>,
    pub medical_profile: Option<MedicalProfileInput>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseBodyError> {
        let email = EmailAddress::new(self.email)?;
        let date_of_birth = parse_iso_date(&self.date_of_birth)
            .ok_or_else(|| ParseBodyError::InvalidDate("date of birth".to_string()))?;
        let medical_profile = self
            .medical_profile
            .map(MedicalProfileInput::into_domain)
            .transpose()?;

        Ok(RegisterUserCommand {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            password: self.password,
            date_of_birth,
            phone_number: self.phone_number,
            address: self.address.map(AddressInput::into_domain),
            emergency_contact: self.emergency_contact.map(EmergencyContactInput::into_domain),
            medical_profile,
        })
    }
}
