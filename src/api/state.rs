//! Application state for shared services

use std::sync::Arc;

use crate::domain::iris::{Split, Table};
use crate::domain::{DatasetRecord, DomainError, IdentityClaims, ModelParameters, Role};
use crate::infrastructure::rate_limit::RateLimiter;
use crate::infrastructure::services::{
    AuthService, DatasetRegistry, Evaluation, IrisPipeline, ParameterService, ParameterWrite,
    Registration,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub dataset_service: Arc<dyn DatasetServiceTrait>,
    pub iris_service: Arc<dyn IrisServiceTrait>,
    pub parameter_service: Arc<dyn ParameterServiceTrait>,
    pub auth_service: Arc<dyn AuthServiceTrait>,
    /// Per-IP window guarding the user listing
    pub users_rate_limiter: Arc<RateLimiter>,
}

/// Trait for dataset registry operations
#[async_trait::async_trait]
pub trait DatasetServiceTrait: Send + Sync {
    async fn get(&self, name: &str) -> Result<DatasetRecord, DomainError>;
    async fn create(&self, record: DatasetRecord) -> Result<DatasetRecord, DomainError>;
    async fn upsert(&self, record: DatasetRecord) -> Result<(DatasetRecord, bool), DomainError>;
    async fn delete(&self, name: &str) -> Result<(), DomainError>;
    async fn check_ready(&self) -> Result<(), DomainError>;
}

/// Trait for the Iris pipeline
#[async_trait::async_trait]
pub trait IrisServiceTrait: Send + Sync {
    async fn load(&self, dataset: Option<&str>) -> Result<Table, DomainError>;
    async fn process(&self) -> Result<Table, DomainError>;
    async fn split(&self) -> Result<Split, DomainError>;
    async fn train(&self) -> Result<String, DomainError>;
    async fn predict(&self) -> Result<Vec<String>, DomainError>;
    async fn evaluate(&self) -> Result<Evaluation, DomainError>;
}

/// Trait for the hyperparameter document
#[async_trait::async_trait]
pub trait ParameterServiceTrait: Send + Sync {
    async fn get(&self) -> Result<ModelParameters, DomainError>;
    async fn put(&self, params: ModelParameters) -> Result<ParameterWrite, DomainError>;
}

/// Trait for authentication and role management
#[async_trait::async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Registration, DomainError>;
    async fn login(&self, email: &str, password: &str) -> Result<String, DomainError>;
    async fn authenticate(&self, token: &str) -> Result<IdentityClaims, DomainError>;
    async fn authorize_admin(&self, token: &str) -> Result<IdentityClaims, DomainError>;
    async fn list_users(&self) -> Result<Vec<IdentityClaims>, DomainError>;
    async fn set_role(&self, user_id: &str, role: Role) -> Result<(), DomainError>;
    async fn get_role(&self, user_id: &str) -> Result<Option<Role>, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl DatasetServiceTrait for DatasetRegistry {
    async fn get(&self, name: &str) -> Result<DatasetRecord, DomainError> {
        DatasetRegistry::get(self, name).await
    }

    async fn create(&self, record: DatasetRecord) -> Result<DatasetRecord, DomainError> {
        DatasetRegistry::create(self, record).await
    }

    async fn upsert(&self, record: DatasetRecord) -> Result<(DatasetRecord, bool), DomainError> {
        DatasetRegistry::upsert(self, record).await
    }

    async fn delete(&self, name: &str) -> Result<(), DomainError> {
        DatasetRegistry::delete(self, name).await
    }

    async fn check_ready(&self) -> Result<(), DomainError> {
        DatasetRegistry::check_ready(self).await
    }
}

#[async_trait::async_trait]
impl IrisServiceTrait for IrisPipeline {
    async fn load(&self, dataset: Option<&str>) -> Result<Table, DomainError> {
        IrisPipeline::load(self, dataset).await
    }

    async fn process(&self) -> Result<Table, DomainError> {
        IrisPipeline::process(self, None).await
    }

    async fn split(&self) -> Result<Split, DomainError> {
        IrisPipeline::split(self).await
    }

    async fn train(&self) -> Result<String, DomainError> {
        IrisPipeline::train(self).await
    }

    async fn predict(&self) -> Result<Vec<String>, DomainError> {
        IrisPipeline::predict(self).await
    }

    async fn evaluate(&self) -> Result<Evaluation, DomainError> {
        IrisPipeline::evaluate(self).await
    }
}

#[async_trait::async_trait]
impl ParameterServiceTrait for ParameterService {
    async fn get(&self) -> Result<ModelParameters, DomainError> {
        ParameterService::get(self).await
    }

    async fn put(&self, params: ModelParameters) -> Result<ParameterWrite, DomainError> {
        ParameterService::put(self, params).await
    }
}

#[async_trait::async_trait]
impl AuthServiceTrait for AuthService {
    async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Registration, DomainError> {
        AuthService::register(self, email, password, role).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        AuthService::login(self, email, password).await
    }

    async fn authenticate(&self, token: &str) -> Result<IdentityClaims, DomainError> {
        AuthService::authenticate(self, token).await
    }

    async fn authorize_admin(&self, token: &str) -> Result<IdentityClaims, DomainError> {
        AuthService::authorize_admin(self, token).await
    }

    async fn list_users(&self) -> Result<Vec<IdentityClaims>, DomainError> {
        AuthService::list_users(self).await
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<(), DomainError> {
        AuthService::set_role(self, user_id, role).await
    }

    async fn get_role(&self, user_id: &str) -> Result<Option<Role>, DomainError> {
        AuthService::get_role(self, user_id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        dataset_service: Arc<dyn DatasetServiceTrait>,
        iris_service: Arc<dyn IrisServiceTrait>,
        parameter_service: Arc<dyn ParameterServiceTrait>,
        auth_service: Arc<dyn AuthServiceTrait>,
        users_rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            dataset_service,
            iris_service,
            parameter_service,
            auth_service,
            users_rate_limiter,
        }
    }
}
