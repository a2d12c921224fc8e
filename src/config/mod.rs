//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, FirebaseConfig, IdentityBackend, IdentityConfig, LogFormat, LoggingConfig,
    MetricsConfig, ParameterStoreBackend, ParameterStoreConfig, PipelineConfig, RateLimitConfig,
    ServerConfig, StorageConfig,
};
