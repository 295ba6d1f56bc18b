use axum::{extract::State, Json};

use crate::middleware::AuthUser;
use crate::services::User;
use crate::AppState;
use service_core::error::AppError;

/// Profile of the authenticated user.
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state
        .auth
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User no longer exists")))?;

    Ok(Json(user))
}
