use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::user::models::MedicalProfile;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Credential service orchestrating hashing, token minting, and the user
/// store for the register / login / profile / change-password flows.
///
/// Holds no mutable state; the token issuer's key and TTL are fixed at
/// startup.
pub struct AuthService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: PasswordHasher,
}

impl<R> AuthService<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            repository,
            token_issuer,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Stamp the last-login timestamp and persist.
    async fn touch_last_login(&self, mut user: User) -> Result<User, UserError> {
        user.last_login = Some(Utc::now());
        self.repository.update(user).await
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<(User, String), UserError> {
        // Fast-path duplicate check for a friendly error. The store's unique
        // constraint on email remains the authoritative guard against the
        // race between this check and create.
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        // The single hashing point of the registration flow.
        let password_hash = self.password_hasher.hash(&command.password)?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
            date_of_birth: command.date_of_birth,
            phone_number: command.phone_number,
            address: command.address,
            emergency_contact: command.emergency_contact,
            medical_profile: command.medical_profile.unwrap_or_else(MedicalProfile::default),
            role: Role::Patient,
            is_active: true,
            last_login: None,
            password_reset_token: None,
            password_reset_expires: None,
            email_verification_token: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
        };

        let user = self.repository.create(user).await?;
        let token = self.token_issuer.mint(user.id)?;
        let user = self.touch_last_login(user).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok((user, token))
    }

    async fn login(&self, email: &str, password: &str) -> Result<(User, String), UserError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(UserError::MissingCredentials);
        }

        let normalized = email.trim().to_lowercase();

        // Unknown email and wrong password take the same exit so the
        // response cannot be used to probe which accounts exist.
        let user = match self.repository.find_by_email(&normalized).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login attempt for unknown email");
                return Err(UserError::InvalidCredentials);
            }
        };

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login attempt for deactivated account");
            return Err(UserError::AccountDeactivated);
        }

        if !self
            .password_hasher
            .verify(password, &user.password_hash)?
        {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let token = self.token_issuer.mint(user.id)?;
        let user = self.touch_last_login(user).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, token))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        // Snapshot in, new value out; the pure update function cannot forget
        // to carry a field the way an in-place mutation could.
        let updated = self.repository.update(user.with_profile_update(command)).await?;

        tracing::info!(user_id = %updated.id, "Profile updated");

        Ok(updated)
    }

    async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if !self
            .password_hasher
            .verify(current_password, &user.password_hash)?
        {
            tracing::warn!(user_id = %user.id, "Password change with wrong current password");
            return Err(UserError::IncorrectPassword);
        }

        // Explicit password-change intent, the only re-hashing point.
        user.password_hash = self.password_hasher.hash(new_password)?;
        self.repository.update(user).await?;

        tracing::info!(user_id = %id, "Password changed");

        Ok(())
    }
}
