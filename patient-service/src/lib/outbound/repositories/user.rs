use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::Address;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::EmergencyContact;
use crate::domain::user::models::MedicalProfile;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = r#"
    id, email, password_hash, first_name, last_name, date_of_birth,
    phone_number, address, emergency_contact, medical_profile, role,
    is_active, last_login, password_reset_token, password_reset_expires,
    email_verification_token, email_verified, created_at, updated_at
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw database row. JSONB columns carry the nested profile structures.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    phone_number: String,
    address: Option<Json<Address>>,
    emergency_contact: Option<Json<EmergencyContact>>,
    medical_profile: Json<MedicalProfile>,
    role: String,
    is_active: bool,
    last_login: Option<DateTime<Utc>>,
    password_reset_token: Option<String>,
    password_reset_expires: Option<DateTime<Utc>>,
    email_verification_token: Option<String>,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
            address: self.address.map(|json| json.0),
            emergency_contact: self.emergency_contact.map(|json| json.0),
            medical_profile: self.medical_profile.0,
            role: self.role.parse().map_err(|e| {
                UserError::DatabaseError(format!("corrupt role column: {e}"))
            })?,
            is_active: self.is_active,
            last_login: self.last_login,
            password_reset_token: self.password_reset_token,
            password_reset_expires: self.password_reset_expires,
            email_verification_token: self.email_verification_token,
            email_verified: self.email_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let query = format!(
            r#"
            INSERT INTO users ({USER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19)
            "#
        );

        sqlx::query(&query)
            .bind(user.id.0)
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(&user.phone_number)
            .bind(user.address.as_ref().map(Json))
            .bind(user.emergency_contact.as_ref().map(Json))
            .bind(Json(&user.medical_profile))
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.last_login)
            .bind(&user.password_reset_token)
            .bind(user.password_reset_expires)
            .bind(&user.email_verification_token)
            .bind(user.email_verified)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation()
                        && db_err.constraint() == Some("users_email_key")
                    {
                        return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                    }
                }
                UserError::DatabaseError(e.to_string())
            })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = LOWER($1)");

        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let query = format!(
            r#"
            UPDATE users
            SET password_hash = $2, first_name = $3, last_name = $4,
                phone_number = $5, address = $6, emergency_contact = $7,
                medical_profile = $8, is_active = $9, last_login = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(user.id.0)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone_number)
            .bind(user.address.as_ref().map(Json))
            .bind(user.emergency_contact.as_ref().map(Json))
            .bind(Json(&user.medical_profile))
            .bind(user.is_active)
            .bind(user.last_login)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => row.try_into_user(),
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }
}
