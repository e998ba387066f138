use super::errors::PasswordError;

/// Default bcrypt cost. Each increment doubles the hashing work, bounding
/// brute-force throughput while keeping interactive latency acceptable.
pub const DEFAULT_WORK_FACTOR: u32 = 12;

/// Lowest cost this hasher will accept; requests below it are clamped.
pub const MIN_WORK_FACTOR: u32 = 10;

/// Highest cost bcrypt supports.
pub const MAX_WORK_FACTOR: u32 = 31;

/// Password hashing implementation.
///
/// Uses bcrypt with a per-password random salt. A hash is computed exactly
/// once per plaintext value; callers are expected to only invoke [`hash`]
/// on an explicit password-set or password-change intent, never on every
/// persistence operation.
///
/// [`hash`]: PasswordHasher::hash
pub struct PasswordHasher {
    work_factor: u32,
}

impl PasswordHasher {
    /// Create a hasher with the default work factor.
    pub fn new() -> Self {
        Self {
            work_factor: DEFAULT_WORK_FACTOR,
        }
    }

    /// Create a hasher with a custom work factor.
    ///
    /// Values outside `MIN_WORK_FACTOR..=MAX_WORK_FACTOR` are clamped.
    pub fn with_work_factor(work_factor: u32) -> Self {
        Self {
            work_factor: work_factor.clamp(MIN_WORK_FACTOR, MAX_WORK_FACTOR),
        }
    }

    /// Hash a plaintext password securely.
    ///
    /// # Returns
    /// Modular crypt format hash (embeds cost and salt)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.work_factor)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The comparison is constant-time with respect to the computed digest,
    /// so a mismatch does not leak where the hashes diverge.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is malformed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::with_work_factor(MIN_WORK_FACTOR);
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        // Never stored in plaintext
        assert_ne!(hash, password);
        assert!(hash.starts_with("$2"));

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::with_work_factor(MIN_WORK_FACTOR);

        let first = hasher.hash("same_password").unwrap();
        let second = hasher.hash("same_password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_work_factor_is_clamped() {
        let hasher = PasswordHasher::with_work_factor(1);
        assert_eq!(hasher.work_factor, MIN_WORK_FACTOR);

        let hasher = PasswordHasher::new();
        assert_eq!(hasher.work_factor, DEFAULT_WORK_FACTOR);
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(result.is_err());
    }
}
