use async_trait::async_trait;
use std::time::Duration;

use crate::config::DatastoreSettings;
use service_core::error::AppError;

/// Connectivity probe against the backing datastore.
///
/// `Ok(false)` means the store answered but reported itself unhealthy; `Err`
/// means the probe itself failed. Exactly one attempt per call, no retries.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn is_healthy(&self) -> Result<bool, AppError>;
}

/// DynamoDB reachability probe.
///
/// DynamoDB endpoints answer plain HTTP GETs, so reachability reduces to one
/// request against the resolved endpoint. The client timeout is this
/// collaborator's own policy; callers see a single pass/fail result.
pub struct DynamoDb {
    client: reqwest::Client,
    probe_url: String,
}

impl DynamoDb {
    pub fn new(settings: &DatastoreSettings) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!(
                    "Failed to build datastore HTTP client: {}",
                    e
                ))
            })?;

        Ok(Self {
            client,
            probe_url: settings.resolved_endpoint(),
        })
    }
}

#[async_trait]
impl Datastore for DynamoDb {
    async fn is_healthy(&self) -> Result<bool, AppError> {
        let response = self
            .client
            .get(&self.probe_url)
            .send()
            .await
            .map_err(|e| AppError::DatastoreError(anyhow::anyhow!("{}", e)))?;

        // Any non-5xx answer means the endpoint is reachable and serving;
        // DynamoDB Local responds 400 to bare GETs.
        Ok(!response.status().is_server_error())
    }
}
