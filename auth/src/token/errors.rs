use thiserror::Error;

/// Error type for token operations.
///
/// `Expired` and `Invalid` are deliberately distinct variants: callers may
/// want different client-facing messaging for a token that was once valid
/// versus one that never was.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}
