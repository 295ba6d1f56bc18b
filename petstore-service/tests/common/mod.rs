//! Test helpers for petstore-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use petstore_service::{
    auth::AuthModule,
    build_router,
    config::{DatastoreSettings, Environment, JwtSettings, PetStoreConfig},
    services::{Datastore, InMemoryUserRepository, User, UserRepository},
    AppState,
};
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-api-key-12345";

/// Scriptable stand-in for the DynamoDB probe.
pub enum ProbeBehavior {
    Healthy,
    Unhealthy,
    Fails(&'static str),
}

pub struct FakeDatastore {
    behavior: ProbeBehavior,
}

#[async_trait]
impl Datastore for FakeDatastore {
    async fn is_healthy(&self) -> Result<bool, AppError> {
        match self.behavior {
            ProbeBehavior::Healthy => Ok(true),
            ProbeBehavior::Unhealthy => Ok(false),
            ProbeBehavior::Fails(message) => {
                Err(AppError::DatastoreError(anyhow::anyhow!(message)))
            }
        }
    }
}

/// Default test configuration; built directly so tests never depend on
/// process environment variables.
pub fn test_config() -> PetStoreConfig {
    PetStoreConfig {
        common: CoreConfig { port: 0 },
        environment: Environment::Development,
        service_name: "PetStore Monolith".to_string(),
        service_version: "1.0.0".to_string(),
        log_level: "info".to_string(),
        jwt: JwtSettings {
            secret: "test-secret".to_string(),
            expires_in: "15m".to_string(),
            issuer: "petstore-api".to_string(),
            audience: "petstore-app".to_string(),
        },
        api_key: TEST_API_KEY.to_string(),
        datastore: DatastoreSettings {
            region: "us-east-1".to_string(),
            endpoint: "AWS".to_string(),
            franchise_table: "petstoreFranchise".to_string(),
            tenants_table: "petstoreTenants".to_string(),
            table_suffix: None,
        },
        allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Test application with a running HTTP server on an ephemeral port.
pub struct TestApp {
    pub address: String,
    pub api_key: String,
    pub users: Arc<InMemoryUserRepository>,
    pub auth: AuthModule,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(ProbeBehavior::Healthy, test_config()).await
    }

    pub async fn spawn_with(behavior: ProbeBehavior, config: PetStoreConfig) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let auth = AuthModule::compose(
            &config.jwt,
            &config.api_key,
            users.clone() as Arc<dyn UserRepository>,
        )
        .expect("Failed to compose auth module");

        let datastore = Arc::new(FakeDatastore { behavior });

        let state = AppState {
            config: config.clone(),
            auth: auth.clone(),
            datastore,
            started_at: Instant::now(),
        };

        let app = build_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server crashed");
        });

        Self {
            address: format!("http://127.0.0.1:{}", port),
            api_key: config.api_key,
            users,
            auth,
        }
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    pub async fn seed_user(&self, id: &str, email: &str) -> User {
        let user = User {
            id: id.to_string(),
            email: email.to_string(),
            display_name: "Test User".to_string(),
            tenant_id: "tenant_1".to_string(),
        };
        self.users
            .insert(user.clone())
            .await
            .expect("Failed to seed user");
        user
    }
}
