use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::AllergySeverity;
use crate::domain::user::models::BloodType;
use crate::domain::user::models::ConditionStatus;
use crate::inbound::http::handlers::change_password::ChangePasswordRequest;
use crate::inbound::http::handlers::login::LoginRequest;
use crate::inbound::http::handlers::register::RegisterRequest;
use crate::inbound::http::handlers::update_profile::UpdateProfileRequest;
use crate::inbound::http::handlers::AddressInput;
use crate::inbound::http::handlers::EmergencyContactInput;
use crate::inbound::http::handlers::MedicalProfileInput;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());

/// E.164-ish: optional `+`, leading digit 1-9, at most 16 digits total.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap());

static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());

/// One failed rule, addressed by the dot/bracket path of the offending
/// field (`medicalProfile.allergies[0].severity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulates rule failures in declaration order. Every rule runs; a bad
/// request reports all of its problems in one round trip.
struct RuleSet {
    errors: Vec<FieldError>,
}

impl RuleSet {
    fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn check(&mut self, field: impl Into<String>, ok: bool, message: &str) {
        if !ok {
            self.errors.push(FieldError {
                field: field.into(),
                message: message.to_string(),
            });
        }
    }

    fn finish(self) -> Vec<FieldError> {
        self.errors
    }
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

fn is_valid_email(value: &str) -> bool {
    email_address::EmailAddress::from_str(value.trim()).is_ok()
}

fn has_required_composition(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, taking the date part.
pub(crate) fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Whole years elapsed since `dob`, by calendar-day count over the mean
/// year length. Future dates come out negative.
fn age_in_years(dob: NaiveDate) -> i64 {
    let days = (Utc::now().date_naive() - dob).num_days();
    (days as f64 / 365.25).floor() as i64
}

pub fn validate_register(body: &RegisterRequest) -> Vec<FieldError> {
    let mut rules = RuleSet::new();

    let first_name = body.first_name.trim();
    rules.check(
        "firstName",
        length_between(first_name, 2, 50),
        "First name must be between 2 and 50 characters",
    );
    rules.check(
        "firstName",
        NAME_PATTERN.is_match(first_name),
        "First name can only contain letters and spaces",
    );

    let last_name = body.last_name.trim();
    rules.check(
        "lastName",
        length_between(last_name, 2, 50),
        "Last name must be between 2 and 50 characters",
    );
    rules.check(
        "lastName",
        NAME_PATTERN.is_match(last_name),
        "Last name can only contain letters and spaces",
    );

    rules.check(
        "email",
        is_valid_email(&body.email),
        "Please enter a valid email address",
    );

    rules.check(
        "password",
        body.password.chars().count() >= 6,
        "Password must be at least 6 characters long",
    );
    rules.check(
        "password",
        has_required_composition(&body.password),
        "Password must contain at least one lowercase letter, one uppercase letter, and one number",
    );

    match parse_iso_date(&body.date_of_birth) {
        Some(dob) => {
            let age = age_in_years(dob);
            rules.check(
                "dateOfBirth",
                (0..=120).contains(&age),
                "Please enter a valid date of birth",
            );
        }
        None => rules.check("dateOfBirth", false, "Please enter a valid date of birth"),
    }

    rules.check(
        "phoneNumber",
        PHONE_PATTERN.is_match(&body.phone_number),
        "Please enter a valid phone number",
    );

    if let Some(address) = &body.address {
        check_address(&mut rules, address);
    }
    if let Some(contact) = &body.emergency_contact {
        check_emergency_contact(&mut rules, contact);
    }
    if let Some(profile) = &body.medical_profile {
        check_medical_profile(&mut rules, profile);
    }

    rules.finish()
}

pub fn validate_login(body: &LoginRequest) -> Vec<FieldError> {
    let mut rules = RuleSet::new();

    rules.check(
        "email",
        is_valid_email(&body.email),
        "Please enter a valid email address",
    );
    rules.check("password", !body.password.is_empty(), "Password is required");

    rules.finish()
}

pub fn validate_update_profile(body: &UpdateProfileRequest) -> Vec<FieldError> {
    let mut rules = RuleSet::new();

    if let Some(first_name) = &body.first_name {
        let first_name = first_name.trim();
        rules.check(
            "firstName",
            length_between(first_name, 2, 50),
            "First name must be between 2 and 50 characters",
        );
        rules.check(
            "firstName",
            NAME_PATTERN.is_match(first_name),
            "First name can only contain letters and spaces",
        );
    }
    if let Some(last_name) = &body.last_name {
        let last_name = last_name.trim();
        rules.check(
            "lastName",
            length_between(last_name, 2, 50),
            "Last name must be between 2 and 50 characters",
        );
        rules.check(
            "lastName",
            NAME_PATTERN.is_match(last_name),
            "Last name can only contain letters and spaces",
        );
    }
    if let Some(phone_number) = &body.phone_number {
        rules.check(
            "phoneNumber",
            PHONE_PATTERN.is_match(phone_number),
            "Please enter a valid phone number",
        );
    }
    if let Some(address) = &body.address {
        check_address(&mut rules, address);
    }
    if let Some(contact) = &body.emergency_contact {
        check_emergency_contact(&mut rules, contact);
    }
    if let Some(profile) = &body.medical_profile {
        check_medical_profile(&mut rules, profile);
    }

    rules.finish()
}

pub fn validate_change_password(body: &ChangePasswordRequest) -> Vec<FieldError> {
    let mut rules = RuleSet::new();

    rules.check(
        "currentPassword",
        !body.current_password.is_empty(),
        "Current password is required",
    );
    rules.check(
        "newPassword",
        body.new_password.chars().count() >= 6,
        "New password must be at least 6 characters long",
    );
    rules.check(
        "newPassword",
        has_required_composition(&body.new_password),
        "New password must contain at least one lowercase letter, one uppercase letter, and one number",
    );

    rules.finish()
}

fn check_address(rules: &mut RuleSet, address: &AddressInput) {
    if let Some(street) = &address.street {
        rules.check(
            "address.street",
            length_between(street.trim(), 5, 100),
            "Street address must be between 5 and 100 characters",
        );
    }
    if let Some(city) = &address.city {
        rules.check(
            "address.city",
            length_between(city.trim(), 2, 50),
            "City must be between 2 and 50 characters",
        );
    }
    if let Some(state) = &address.state {
        rules.check(
            "address.state",
            length_between(state.trim(), 2, 50),
            "State must be between 2 and 50 characters",
        );
    }
    if let Some(zip_code) = &address.zip_code {
        rules.check(
            "address.zipCode",
            ZIP_PATTERN.is_match(zip_code),
            "Please enter a valid ZIP code",
        );
    }
}

fn check_emergency_contact(rules: &mut RuleSet, contact: &EmergencyContactInput) {
    if let Some(name) = &contact.name {
        rules.check(
            "emergencyContact.name",
            length_between(name.trim(), 2, 100),
            "Emergency contact name must be between 2 and 100 characters",
        );
    }
    if let Some(phone_number) = &contact.phone_number {
        rules.check(
            "emergencyContact.phoneNumber",
            PHONE_PATTERN.is_match(phone_number),
            "Please enter a valid emergency contact phone number",
        );
    }
}

fn check_medical_profile(rules: &mut RuleSet, profile: &MedicalProfileInput) {
    if let Some(blood_type) = &profile.blood_type {
        rules.check(
            "medicalProfile.bloodType",
            BloodType::from_str(blood_type).is_ok(),
            "Please enter a valid blood type",
        );
    }
    for (i, allergy) in profile.allergies.iter().enumerate() {
        if let Some(name) = &allergy.name {
            rules.check(
                format!("medicalProfile.allergies[{i}].name"),
                length_between(name.trim(), 2, 100),
                "Allergy name must be between 2 and 100 characters",
            );
        }
        if let Some(severity) = &allergy.severity {
            rules.check(
                format!("medicalProfile.allergies[{i}].severity"),
                AllergySeverity::from_str(severity).is_ok(),
                "Allergy severity must be Mild, Moderate, or Severe",
            );
        }
    }
    for (i, medication) in profile.medications.iter().enumerate() {
        if let Some(name) = &medication.name {
            rules.check(
                format!("medicalProfile.medications[{i}].name"),
                length_between(name.trim(), 2, 100),
                "Medication name must be between 2 and 100 characters",
            );
        }
        if let Some(dosage) = &medication.dosage {
            rules.check(
                format!("medicalProfile.medications[{i}].dosage"),
                length_between(dosage.trim(), 1, 50),
                "Medication dosage must be between 1 and 50 characters",
            );
        }
    }
    for (i, condition) in profile.conditions.iter().enumerate() {
        if let Some(name) = &condition.name {
            rules.check(
                format!("medicalProfile.conditions[{i}].name"),
                length_between(name.trim(), 2, 100),
                "Condition name must be between 2 and 100 characters",
            );
        }
        if let Some(status) = &condition.status {
            rules.check(
                format!("medicalProfile.conditions[{i}].status"),
                ConditionStatus::from_str(status).is_ok(),
                "Condition status must be Active, Inactive, or Resolved",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::Days;

    use super::*;
    use crate::inbound::http::handlers::AllergyInput;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            password: "Passw0rd".to_string(),
            date_of_birth: "1990-05-15".to_string(),
            phone_number: "+15551234567".to_string(),
            address: None,
            emergency_contact: None,
            medical_profile: None,
        }
    }

    #[test]
    fn accepts_a_well_formed_registration() {
        assert!(validate_register(&valid_register()).is_empty());
    }

    #[test]
    fn rejects_passwords_missing_a_character_class() {
        for password in ["abc123", "ABC123", "Abcdef"] {
            let mut body = valid_register();
            body.password = password.to_string();
            let errors = validate_register(&body);
            assert_eq!(errors.len(), 1, "password {password:?}");
            assert_eq!(errors[0].field, "password");
            assert_eq!(
                errors[0].message,
                "Password must contain at least one lowercase letter, one uppercase letter, and one number"
            );
        }
    }

    #[test]
    fn accepts_a_minimal_compliant_password() {
        let mut body = valid_register();
        body.password = "Abcde1".to_string();
        assert!(validate_register(&body).is_empty());
    }

    #[test]
    fn short_password_reports_the_length_rule() {
        let mut body = valid_register();
        body.password = "Ab1".to_string();
        let errors = validate_register(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Password must be at least 6 characters long");
    }

    #[test]
    fn accumulates_every_failure_in_rule_order() {
        let body = RegisterRequest {
            first_name: "J".to_string(),
            last_name: "Doe4".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            date_of_birth: "yesterday".to_string(),
            phone_number: "0".to_string(),
            address: None,
            emergency_contact: None,
            medical_profile: None,
        };

        let errors = validate_register(&body);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "firstName",
                "lastName",
                "email",
                "password",
                "password",
                "dateOfBirth",
                "phoneNumber"
            ]
        );
    }

    #[test]
    fn age_boundaries_are_inclusive() {
        let today = Utc::now().date_naive();

        let mut body = valid_register();
        body.date_of_birth = today.format("%Y-%m-%d").to_string();
        assert!(validate_register(&body).is_empty(), "age 0 is valid");

        body.date_of_birth = today
            .with_year(today.year() - 120)
            .unwrap()
            .checked_add_days(Days::new(1))
            .unwrap()
            .format("%Y-%m-%d")
            .to_string();
        assert!(validate_register(&body).is_empty(), "age 120 is valid");

        body.date_of_birth = today
            .with_year(today.year() - 122)
            .unwrap()
            .format("%Y-%m-%d")
            .to_string();
        let errors = validate_register(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "dateOfBirth");
    }

    #[test]
    fn future_date_of_birth_is_rejected() {
        let mut body = valid_register();
        body.date_of_birth = (Utc::now().date_naive() + Days::new(30))
            .format("%Y-%m-%d")
            .to_string();
        let errors = validate_register(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "dateOfBirth");
    }

    #[test]
    fn nested_medical_profile_paths_use_array_indices() {
        let mut body = valid_register();
        body.medical_profile = Some(MedicalProfileInput {
            blood_type: Some("Z+".to_string()),
            allergies: vec![
                AllergyInput {
                    name: Some("Peanuts".to_string()),
                    severity: Some("Severe".to_string()),
                    notes: None,
                },
                AllergyInput {
                    name: Some("X".to_string()),
                    severity: Some("Lethal".to_string()),
                    notes: None,
                },
            ],
            medications: vec![],
            conditions: vec![],
        });

        let errors = validate_register(&body);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "medicalProfile.bloodType",
                "medicalProfile.allergies[1].name",
                "medicalProfile.allergies[1].severity"
            ]
        );
        assert_eq!(errors[2].message, "Allergy severity must be Mild, Moderate, or Severe");
    }

    #[test]
    fn login_requires_a_password_and_well_formed_email() {
        let body = LoginRequest {
            email: "nope".to_string(),
            password: String::new(),
        };
        let errors = validate_login(&body);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Please enter a valid email address");
        assert_eq!(errors[1].message, "Password is required");
    }

    #[test]
    fn update_profile_skips_rules_for_absent_fields() {
        let body = UpdateProfileRequest {
            first_name: None,
            last_name: None,
            phone_number: None,
            address: None,
            emergency_contact: None,
            medical_profile: None,
        };
        assert!(validate_update_profile(&body).is_empty());
    }

    #[test]
    fn update_profile_still_validates_present_fields() {
        let body = UpdateProfileRequest {
            first_name: Some("X".to_string()),
            last_name: None,
            phone_number: Some("abc".to_string()),
            address: Some(AddressInput {
                zip_code: Some("123".to_string()),
                ..Default::default()
            }),
            emergency_contact: None,
            medical_profile: None,
        };
        let errors = validate_update_profile(&body);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["firstName", "phoneNumber", "address.zipCode"]);
    }

    #[test]
    fn change_password_applies_composition_to_the_new_password() {
        let body = ChangePasswordRequest {
            current_password: String::new(),
            new_password: "abcdef".to_string(),
        };
        let errors = validate_change_password(&body);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Current password is required");
        assert_eq!(
            errors[1].message,
            "New password must contain at least one lowercase letter, one uppercase letter, and one number"
        );
    }
}
