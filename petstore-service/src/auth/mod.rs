//! Auth composition unit: assembles the token service, the access guards,
//! and the user-repository handle into one capability set. Owns no business
//! logic of its own.

use axum::http::{header, HeaderMap};
use std::sync::Arc;

use crate::config::JwtSettings;
use crate::services::{AccessTokenClaims, TokenService, UserRepository};
use service_core::error::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Request-level access control: allow (yielding a grant) or deny.
///
/// Stateless per-request evaluation; denial is always
/// [`AppError::Unauthorized`], with no side effects beyond the decision.
pub trait AccessGuard {
    type Grant;

    fn check(&self, headers: &HeaderMap) -> Result<Self::Grant, AppError>;
}

/// Guard for `Authorization: Bearer <token>`; allowing yields the decoded
/// claims.
#[derive(Clone)]
pub struct BearerTokenGuard {
    tokens: TokenService,
}

impl BearerTokenGuard {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl AccessGuard for BearerTokenGuard {
    type Grant = AccessTokenClaims;

    fn check(&self, headers: &HeaderMap) -> Result<AccessTokenClaims, AppError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
            })?;

        self.tokens
            .verify(token)
            .map_err(|_| AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token")))
    }
}

/// Guard for the `x-api-key` header.
#[derive(Clone)]
pub struct ApiKeyGuard {
    api_key: String,
}

impl ApiKeyGuard {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl AccessGuard for ApiKeyGuard {
    type Grant = ();

    fn check(&self, headers: &HeaderMap) -> Result<(), AppError> {
        match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
            Some(key) if key == self.api_key => Ok(()),
            _ => {
                tracing::warn!("Failed API key authentication attempt");
                Err(AppError::Unauthorized(anyhow::anyhow!(
                    "Invalid or missing API key"
                )))
            }
        }
    }
}

/// The assembled authentication capabilities, built once at startup and
/// shared read-only by the route handlers.
#[derive(Clone)]
pub struct AuthModule {
    pub tokens: TokenService,
    pub bearer: BearerTokenGuard,
    pub api_key: ApiKeyGuard,
    /// Handle to the user store, produced by the storage collaborator and
    /// re-exported here.
    pub users: Arc<dyn UserRepository>,
}

impl AuthModule {
    /// Wire the capability set from fully-resolved configuration.
    ///
    /// Token settings must already be validated; this fails only when the
    /// expiry cannot be parsed.
    pub fn compose(
        jwt: &JwtSettings,
        api_key: &str,
        users: Arc<dyn UserRepository>,
    ) -> Result<Self, AppError> {
        let tokens = TokenService::new(jwt)?;

        let module = Self {
            bearer: BearerTokenGuard::new(tokens.clone()),
            api_key: ApiKeyGuard::new(api_key),
            tokens,
            users,
        };

        tracing::info!(
            issuer = %jwt.issuer,
            audience = %jwt.audience,
            "Auth module composed"
        );

        Ok(module)
    }
}
