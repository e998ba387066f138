use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::domain::user::models::Address;
use crate::domain::user::models::Allergy;
use crate::domain::user::models::BloodType;
use crate::domain::user::models::EmergencyContact;
use crate::domain::user::models::MedicalCondition;
use crate::domain::user::models::MedicalProfile;
use crate::domain::user::models::Medication;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::inbound::http::validation::parse_iso_date;
use crate::inbound::http::validation::FieldError;
use crate::user::errors::EmailError;
use crate::user::errors::InvalidEnumValue;
use crate::user::errors::UserError;

pub mod change_password;
pub mod get_me;
pub mod login;
pub mod logout;
pub mod register;
pub mod update_profile;

/// Success response wrapper: `{"success": true, "message"?, "data": ...}`.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                success: true,
                message: None,
                data: Some(data),
            }),
        )
    }

    pub fn with_message(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                success: true,
                message: Some(message.to_string()),
                data: Some(data),
            }),
        )
    }
}

impl ApiSuccess<()> {
    /// Response with a message and no `data` key.
    pub fn message_only(status: StatusCode, message: &str) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                success: true,
                message: Some(message.to_string()),
                data: None,
            }),
        )
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponseBody<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// `{"user": ...}` payload used by the endpoints that return one account.
#[derive(Debug, Clone, Serialize)]
pub struct UserData<T: Serialize> {
    pub user: T,
}

/// Failure response: `{"success": false, "message", "errors"?}`.
///
/// `Internal` carries the real failure for the server log; the client only
/// ever sees a generic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(Vec<FieldError>),
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
struct ApiErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string(), None)
            }
        };

        (
            status,
            Json(ApiErrorBody {
                success: false,
                message,
                errors,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::MissingCredentials => {
                ApiError::BadRequest("Please provide email and password".to_string())
            }
            UserError::EmailAlreadyExists(_) => {
                ApiError::BadRequest("User with this email already exists".to_string())
            }
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::AccountDeactivated => ApiError::Unauthorized(
                "Account is deactivated. Please contact support.".to_string(),
            ),
            UserError::IncorrectPassword => {
                ApiError::Unauthorized("Current password is incorrect".to_string())
            }
            UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidFieldValue(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Parse failure while converting a validated body into domain types.
#[derive(Debug, Clone, Error)]
pub enum ParseBodyError {
    #[error("Please enter a valid {0}")]
    InvalidDate(String),

    #[error(transparent)]
    InvalidEnum(#[from] InvalidEnumValue),

    #[error(transparent)]
    Email(#[from] EmailError),
}

impl From<ParseBodyError> for ApiError {
    fn from(err: ParseBodyError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

/// Raw postal address body (all fields optional strings).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl AddressInput {
    pub fn into_domain(self) -> Address {
        Address {
            street: self.street.map(trimmed),
            city: self.city.map(trimmed),
            state: self.state.map(trimmed),
            zip_code: self.zip_code,
            country: self.country.unwrap_or_else(Address::default_country),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContactInput {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
}

impl EmergencyContactInput {
    pub fn into_domain(self) -> EmergencyContact {
        EmergencyContact {
            name: self.name.map(trimmed),
            relationship: self.relationship,
            phone_number: self.phone_number,
        }
    }
}

/// Raw medical profile body. Enum and date fields arrive as plain strings so
/// the validator can report every bad value instead of failing
/// deserialization on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalProfileInput {
    pub blood_type: Option<String>,
    pub allergies: Vec<AllergyInput>,
    pub medications: Vec<MedicationInput>,
    pub conditions: Vec<ConditionInput>,
}

impl MedicalProfileInput {
    pub fn into_domain(self) -> Result<MedicalProfile, ParseBodyError> {
        let blood_type = match self.blood_type {
            Some(value) => value.parse::<BloodType>()?,
            None => BloodType::default(),
        };

        let allergies = self
            .allergies
            .into_iter()
            .map(AllergyInput::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        let medications = self
            .medications
            .into_iter()
            .map(MedicationInput::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        let conditions = self
            .conditions
            .into_iter()
            .map(ConditionInput::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MedicalProfile {
            blood_type,
            allergies,
            medications,
            conditions,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllergyInput {
    pub name: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<String>,
}

impl AllergyInput {
    fn into_domain(self) -> Result<Allergy, ParseBodyError> {
        Ok(Allergy {
            name: self.name.map(trimmed),
            severity: match self.severity {
                Some(value) => value.parse()?,
                None => Default::default(),
            },
            notes: self.notes,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicationInput {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub prescribed_by: Option<String>,
    pub notes: Option<String>,
}

impl MedicationInput {
    fn into_domain(self) -> Result<Medication, ParseBodyError> {
        Ok(Medication {
            name: self.name.map(trimmed),
            dosage: self.dosage.map(trimmed),
            frequency: self.frequency,
            start_date: parse_optional_date(self.start_date, "medication start date")?,
            end_date: parse_optional_date(self.end_date, "medication end date")?,
            prescribed_by: self.prescribed_by,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionInput {
    pub name: Option<String>,
    pub diagnosed_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl ConditionInput {
    fn into_domain(self) -> Result<MedicalCondition, ParseBodyError> {
        Ok(MedicalCondition {
            name: self.name.map(trimmed),
            diagnosed_date: parse_optional_date(self.diagnosed_date, "condition diagnosed date")?,
            status: match self.status {
                Some(value) => value.parse()?,
                None => Default::default(),
            },
            notes: self.notes,
        })
    }
}

fn parse_optional_date(
    value: Option<String>,
    field: &str,
) -> Result<Option<chrono::NaiveDate>, ParseBodyError> {
    match value {
        Some(raw) => parse_iso_date(&raw)
            .map(Some)
            .ok_or_else(|| ParseBodyError::InvalidDate(field.to_string())),
        None => Ok(None),
    }
}

/// Narrow projection returned by register and login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub medical_profile: MedicalProfile,
}

impl From<&User> for AuthUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role,
            medical_profile: user.medical_profile.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponseData {
    pub user: AuthUserData,
    pub token: String,
}

/// Projection returned by profile updates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUserData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub medical_profile: MedicalProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
}

impl From<&User> for ProfileUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role,
            medical_profile: user.medical_profile.clone(),
            address: user.address.clone(),
            emergency_contact: user.emergency_contact.clone(),
        }
    }
}

/// Self-fetch projection: everything the account owner may see. Still no
/// password hash or reset/verification tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullUserData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub medical_profile: MedicalProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for FullUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role,
            medical_profile: user.medical_profile.clone(),
            address: user.address.clone(),
            emergency_contact: user.emergency_contact.clone(),
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}
