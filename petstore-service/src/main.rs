use petstore_service::{
    auth::AuthModule,
    build_router,
    config::PetStoreConfig,
    services::{DynamoDb, InMemoryUserRepository, UserRepository},
    AppState,
};
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = PetStoreConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = %config.environment,
        "Starting PetStore monolith"
    );

    // The user store is owned by an external collaborator; the in-memory
    // repository stands in for it until that service is wired up.
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());

    let datastore = Arc::new(DynamoDb::new(&config.datastore)?);
    tracing::info!(
        region = %config.datastore.region,
        endpoint = %config.datastore.endpoint,
        "Datastore probe initialized"
    );

    let auth = AuthModule::compose(&config.jwt, &config.api_key, users)?;

    let state = AppState {
        config: config.clone(),
        auth,
        datastore,
        started_at: Instant::now(),
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
