use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use auth::TokenError;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated account through the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
}

/// Access guard for the protected routes. Verifies the bearer token,
/// resolves the account it names, and stashes the identity in request
/// extensions for the handler.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?;

    let claims = state.token_issuer.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        let message = match e {
            TokenError::Expired => "Token has expired",
            _ => "Invalid token",
        };
        ApiError::Unauthorized(message.to_string()).into_response()
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        ApiError::Unauthorized("Invalid token".to_string()).into_response()
    })?;

    // The token may outlive the account. A missing record is a 404, not a
    // credential failure.
    state
        .auth_service
        .get_user(&user_id)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(CurrentUser { user_id });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let unauthorized =
        || ApiError::Unauthorized("Not authorized to access this route".to_string()).into_response();

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(unauthorized)?;

    let value = header.to_str().map_err(|_| unauthorized())?;

    value.strip_prefix("Bearer ").ok_or_else(unauthorized)
}
