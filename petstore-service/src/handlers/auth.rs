use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::services::TokenResponse;
use crate::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// Service-to-service token minting, guarded by the API key at the route
/// layer. The caller is trusted; the user must still exist.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate()?;

    let user = state
        .auth
        .users
        .find_by_id(&req.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Unknown user")))?;

    let access_token = state.auth.tokens.issue(&user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "Access token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.tokens.expires_in_seconds(),
    }))
}
