//! Cloudinary document store
//!
//! Uploads documents to Cloudinary's unsigned upload endpoint and records the
//! returned `secure_url` as the document reference.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use core_kernel::{DomainPort, PortError};
use domain_loan::{DocumentStore, StoredDocument, UploadFile};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Cloudinary connection settings
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Account cloud name
    pub cloud_name: String,
    /// Unsigned upload preset
    pub upload_preset: String,
    /// API base; overridable for testing
    pub api_base: String,
}

impl CloudinaryConfig {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// The auto-upload endpoint for this account
    pub fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/auto/upload", self.api_base, self.cloud_name)
    }
}

/// Response body of a Cloudinary upload
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl UploadResponse {
    fn into_url(self) -> Option<String> {
        self.secure_url.or(self.url)
    }
}

/// Document store backed by Cloudinary
#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl DomainPort for CloudinaryStore {}

#[async_trait]
impl DocumentStore for CloudinaryStore {
    async fn store(&self, file: UploadFile, folder: &str) -> Result<StoredDocument, PortError> {
        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| PortError::validation(format!("invalid content type: {e}")))?;
        }

        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", folder.to_string())
            .part("file", part);

        let response = self
            .http
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::Connection {
                message: format!("cloudinary upload failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::ServiceUnavailable {
                service: format!("cloudinary ({status})"),
            });
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            PortError::internal(format!("cloudinary returned an unreadable body: {e}"))
        })?;

        let url = body
            .into_url()
            .ok_or_else(|| PortError::internal("cloudinary response carried no URL"))?;

        debug!(%url, "Uploaded document to Cloudinary");
        Ok(StoredDocument { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url() {
        let config = CloudinaryConfig::new("demo-cloud", "loan-docs");
        assert_eq!(
            config.upload_url(),
            "https://api.cloudinary.com/v1_1/demo-cloud/auto/upload"
        );
    }

    #[test]
    fn test_api_base_override_trims_slash() {
        let config =
            CloudinaryConfig::new("demo-cloud", "loan-docs").with_api_base("http://localhost:9000/");
        assert_eq!(
            config.upload_url(),
            "http://localhost:9000/v1_1/demo-cloud/auto/upload"
        );
    }

    #[test]
    fn test_response_prefers_secure_url() {
        let body: UploadResponse = serde_json::from_str(
            r#"{"secure_url":"https://res.example/doc.pdf","url":"http://res.example/doc.pdf"}"#,
        )
        .unwrap();
        assert_eq!(body.into_url().unwrap(), "https://res.example/doc.pdf");

        let body: UploadResponse =
            serde_json::from_str(r#"{"url":"http://res.example/doc.pdf"}"#).unwrap();
        assert_eq!(body.into_url().unwrap(), "http://res.example/doc.pdf");

        let body: UploadResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_url().is_none());
    }
}
