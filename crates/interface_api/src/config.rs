//! API configuration

use serde::Deserialize;

/// Which blob-storage backend holds uploaded documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Local uploads directory, served statically by this server
    Local,
    /// Cloudinary HTTP upload
    Cloudinary,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Blob-storage backend for uploads
    pub storage_backend: StorageBackend,
    /// Local uploads directory (local backend)
    pub uploads_dir: String,
    /// Public base URL of the uploads directory (local backend)
    pub uploads_base_url: String,
    /// Cloudinary cloud name (cloudinary backend)
    pub cloudinary_cloud_name: Option<String>,
    /// Cloudinary unsigned upload preset (cloudinary backend)
    pub cloudinary_upload_preset: Option<String>,
    /// Transactional mail API endpoint; mail is disabled when absent
    pub mail_endpoint: Option<String>,
    /// Mail API key
    pub mail_api_key: Option<String>,
    /// Mail sender address
    pub mail_from: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/loans".to_string(),
            log_level: "info".to_string(),
            storage_backend: StorageBackend::Local,
            uploads_dir: "uploads".to_string(),
            uploads_base_url: "http://localhost:8080/uploads".to_string(),
            cloudinary_cloud_name: None,
            cloudinary_upload_preset: None,
            mail_endpoint: None,
            mail_api_key: None,
            mail_from: "Loan Portal <no-reply@example.com>".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Mail settings, when fully configured
    pub fn mail_config(&self) -> Option<infra_notify::MailConfig> {
        match (&self.mail_endpoint, &self.mail_api_key) {
            (Some(endpoint), Some(api_key)) => Some(infra_notify::MailConfig {
                endpoint: endpoint.clone(),
                api_key: api_key.clone(),
                from: self.mail_from.clone(),
            }),
            _ => None,
        }
    }
}
