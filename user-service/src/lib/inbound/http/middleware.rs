use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Middleware that validates bearer tokens and attaches the resolved
/// [`AuthenticatedUser`](crate::domain::user::models::AuthenticatedUser) to
/// the request extensions.
///
/// Handlers behind this layer read the identity with
/// `Extension<AuthenticatedUser>` and must not verify the token again.
pub async fn authenticate<S: UserServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers())?;

    let user = state.user_service.parse_token(token).await.map_err(|e| {
        match &e {
            UserError::InvalidToken(reason) => {
                tracing::warn!(reason = %reason, "Bearer token rejected");
            }
            _ => tracing::error!(error = %e, "Bearer token could not be checked"),
        }
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// The header must split into exactly two whitespace-separated parts and
/// the scheme must be `Bearer`, case-sensitive.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let invalid = || ApiError::Unauthorized("Invalid Authorization header".to_string());

    let value = header.to_str().map_err(|_| invalid())?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(invalid()),
    }
}
