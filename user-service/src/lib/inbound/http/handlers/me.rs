use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use crate::domain::user::models::AuthenticatedUser;

/// Echo the identity the auth gate attached to this request.
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<AuthenticatedUser> {
    ApiSuccess::new(StatusCode::OK, user)
}
