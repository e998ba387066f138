use async_trait::async_trait;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for credential and profile operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue a bearer token.
    ///
    /// # Returns
    /// Created user entity and a freshly minted token
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered (either the
    ///   fast-path check or the store's uniqueness constraint)
    /// * `Password` - Hashing failed
    /// * `Token` - Token minting failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<(User, String), UserError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown email and wrong password both surface as
    /// `InvalidCredentials` so responses cannot be used to enumerate
    /// accounts.
    ///
    /// # Errors
    /// * `MissingCredentials` - Email or password is empty
    /// * `InvalidCredentials` - No such user, or password mismatch
    /// * `AccountDeactivated` - User exists but is inactive
    async fn login(&self, email: &str, password: &str) -> Result<(User, String), UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Partially update a user's profile. Absent fields are left untouched.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Replace the user's password after verifying the current one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `IncorrectPassword` - Current password does not match
    async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// The store enforces email uniqueness; a violation surfaces as
    /// `EmailAlreadyExists` regardless of any earlier application check.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized (lowercased) email address.
    ///
    /// The returned entity includes the password hash; projections that
    /// exclude it are the caller's concern.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;
}
