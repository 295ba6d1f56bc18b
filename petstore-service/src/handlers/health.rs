//! Health reporting endpoints.
//!
//! Every endpoint is a pure, idempotent read answering HTTP 200; the
//! `status` field in the body is the signal. Probe results are advisory and
//! never gate traffic.

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use sysinfo::{get_current_pid, System};

use crate::AppState;
use service_core::error::AppError;

const DB_ENGINE: &str = "DynamoDB";
const DB_UNHEALTHY_MESSAGE: &str = "Database is not responding";

/// Liveness: process status, uptime, and environment name.
pub async fn basic_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "environment": state.config.environment.as_str(),
    }))
}

/// Identity: static service name and version for this build.
pub async fn app_identity(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Datastore connectivity, with the resolved table names.
///
/// The probe is called exactly once; a probe failure is converted into the
/// error payload and never escapes this handler.
pub async fn database_status(State(state): State<AppState>) -> Json<Value> {
    let settings = &state.config.datastore;
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.datastore.is_healthy().await {
        Ok(true) => Json(json!({
            "status": "ok",
            "database": DB_ENGINE,
            "region": settings.region,
            "endpoint": settings.endpoint,
            "tables": {
                "franchise": settings.franchise_table_name(),
                "tenants": settings.tenants_table_name(),
            },
            "timestamp": timestamp,
        })),
        Ok(false) => {
            tracing::error!("Datastore reported unhealthy");
            Json(json!({
                "status": "error",
                "database": DB_ENGINE,
                "error": DB_UNHEALTHY_MESSAGE,
                "timestamp": timestamp,
            }))
        }
        Err(err) => {
            tracing::error!(error = %err, "Datastore health probe failed");
            let message = match &err {
                AppError::DatastoreError(inner) => inner.to_string(),
                other => other.to_string(),
            };
            Json(json!({
                "status": "error",
                "database": DB_ENGINE,
                "error": message,
                "timestamp": timestamp,
            }))
        }
    }
}

/// Process memory counters, in whole megabytes.
pub async fn memory_status() -> Result<Json<Value>, AppError> {
    let pid = get_current_pid().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to resolve current pid: {}", e))
    })?;

    let mut system = System::new();
    system.refresh_process(pid);
    let process = system.process(pid).ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!("Current process missing from system table"))
    })?;

    let resident = process.memory();
    let virtual_size = process.virtual_memory();
    let heap_used = resident.min(virtual_size);
    let external = virtual_size.saturating_sub(resident);

    Ok(Json(json!({
        "status": "ok",
        "memory": {
            "rss": to_megabytes(resident),
            "heapTotal": to_megabytes(virtual_size),
            "heapUsed": to_megabytes(heap_used),
            "external": to_megabytes(external),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

fn to_megabytes(bytes: u64) -> u64 {
    bytes / (1024 * 1024)
}
