use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::auth::AccessGuard;
use crate::services::AccessTokenClaims;
use crate::AppState;
use service_core::error::AppError;

/// Middleware to require a valid bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.auth.bearer.check(req.headers())?;

    // Handlers read the claims back through the AuthUser extractor.
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware to require the service API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.auth.api_key.check(req.headers())?;

    Ok(next.run(req).await)
}

/// Extractor to easily get claims in handlers.
pub struct AuthUser(pub AccessTokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<AccessTokenClaims>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Auth claims missing from request extensions"))
        })?;

        Ok(AuthUser(claims.clone()))
    }
}
