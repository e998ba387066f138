use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Mints and verifies signed, time-bounded bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signing key and time-to-live are
/// fixed at construction; the issuer holds no other state.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Signing key; should be at least 256 bits and come from
    ///   configuration, never from code
    /// * `ttl_hours` - Hours until a minted token expires
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Mint a token for a subject.
    ///
    /// # Returns
    /// Signed JWT embedding the subject and an expiry `ttl` from now
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn mint(&self, subject: impl ToString) -> Result<String, TokenError> {
        let claims = Claims::for_subject(subject, self.ttl);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    /// * `Expired` - Signature is valid but the expiry has passed
    /// * `Invalid` - Signature is invalid or the token is malformed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_mint_and_verify() {
        let issuer = TokenIssuer::new(SECRET, 24);

        let token = issuer.mint("user123").expect("Failed to mint token");
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).expect("Failed to verify token");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_verify_expired_token() {
        // Negative TTL places the expiry well past the default leeway.
        let issuer = TokenIssuer::new(SECRET, -2);

        let token = issuer.mint("user123").expect("Failed to mint token");

        let result = issuer.verify(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issuer = TokenIssuer::new(SECRET, 24);
        let other = TokenIssuer::new(b"another_secret_key_32_bytes_long!!", 24);

        let token = issuer.mint("user123").expect("Failed to mint token");

        let result = other.verify(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_malformed_token() {
        let issuer = TokenIssuer::new(SECRET, 24);

        let result = issuer.verify("not.a.token");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }
}
