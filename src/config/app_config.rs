use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub parameter_store: ParameterStoreConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// File locations for persisted state
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Dataset catalog JSON document
    pub datasets_path: String,
    /// Local copy of the Iris CSV
    pub iris_csv_path: String,
    /// Trained model artifact
    pub model_path: String,
    /// Seed document for the in-memory parameter store
    pub parameters_seed_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Registry entry fetched when the local CSV is missing
    pub dataset_name: String,
    pub test_fraction: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBackend {
    #[default]
    Memory,
    Firebase,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct IdentityConfig {
    pub backend: IdentityBackend,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStoreBackend {
    #[default]
    Memory,
    Firestore,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParameterStoreConfig {
    pub backend: ParameterStoreBackend,
    pub collection: String,
    pub document_id: String,
}

/// Firebase project settings
///
/// The URL fields default to the public Google endpoints and can point at the
/// local emulators instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub web_api_key: String,
    /// Service account key file used for admin calls
    pub credentials_path: Option<String>,
    /// Static bearer token used instead of the service account (emulators)
    pub access_token: Option<String>,
    pub identity_toolkit_url: String,
    pub firestore_url: String,
    pub jwks_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Allowed `GET /users` calls per client IP and minute
    pub users_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            datasets_path: "config/urls_config.json".to_string(),
            iris_csv_path: "data/Iris.csv".to_string(),
            model_path: "models/iris_model.json".to_string(),
            parameters_seed_path: "config/model_parameters.json".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_name: "iris".to_string(),
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl Default for ParameterStoreConfig {
    fn default() -> Self {
        Self {
            backend: ParameterStoreBackend::default(),
            collection: "parameters".to_string(),
            document_id: "parameters".to_string(),
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            web_api_key: String::new(),
            credentials_path: None,
            access_token: None,
            identity_toolkit_url: "https://identitytoolkit.googleapis.com".to_string(),
            firestore_url: "https://firestore.googleapis.com".to_string(),
            jwks_url: "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com".to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { users_per_minute: 5 }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
