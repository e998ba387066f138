use axum::http::StatusCode;

use super::ApiSuccess;

/// Stateless logout. Tokens are not revoked server-side; the client is
/// expected to discard its copy.
pub async fn logout() -> ApiSuccess<()> {
    ApiSuccess::message_only(StatusCode::OK, "Logged out successfully")
}
