use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use service_core::error::AppError;

/// A PetStore user. Every user belongs to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub tenant_id: String,
}

/// Read/write access to the user store.
///
/// The store itself is owned by an external collaborator; this crate only
/// consumes the handle. Implementations must be safe for concurrent use.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn insert(&self, user: User) -> Result<(), AppError>;
}

/// In-memory user repository, standing in for the external user store in
/// local runs and tests.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let users = self
            .users
            .read()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("User store lock poisoned")))?;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self
            .users
            .read()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("User store lock poisoned")))?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: User) -> Result<(), AppError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("User store lock poisoned")))?;
        users.insert(user.id.clone(), user);
        Ok(())
    }
}
