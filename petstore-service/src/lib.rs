pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::AuthModule;
use crate::config::PetStoreConfig;
use crate::services::Datastore;
use service_core::middleware::request_id::{request_id_middleware, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub config: PetStoreConfig,
    pub auth: AuthModule,
    pub datastore: Arc<dyn Datastore>,
    pub started_at: Instant,
}

pub fn build_router(state: AppState) -> Router {
    // Token minting is API-key guarded
    let token_route = Router::new()
        .route("/auth/token", post(handlers::auth::issue_token))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_api_key,
        ));

    // Profile routes require a bearer token
    let user_routes = Router::new()
        .route("/users/me", get(handlers::user::get_me))
        .layer(from_fn_with_state(state.clone(), middleware::require_bearer));

    let allowed_origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();

    Router::new()
        .route("/health", get(handlers::health::basic_status))
        .route("/health/app", get(handlers::health::app_identity))
        .route("/health/database", get(handlers::health::database_status))
        .route("/health/memory", get(handlers::health::memory_status))
        .merge(token_route)
        .merge(user_routes)
        .with_state(state)
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        // Assign request ids before the trace span reads them
        .layer(from_fn(request_id_middleware))
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    header::HeaderName::from_static("x-api-key"),
                    header::HeaderName::from_static("x-request-id"),
                ]),
        )
}
