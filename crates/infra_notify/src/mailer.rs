//! Mail senders

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use core_kernel::{DomainPort, PortError};
use domain_loan::Notifier;

/// Mail provider settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP endpoint of the transactional mail API
    pub endpoint: String,
    /// Bearer token for the mail API
    pub api_key: String,
    /// Sender address, e.g. `Loan Portal <no-reply@example.com>`
    pub from: String,
}

/// Request body for the transactional mail API
#[derive(Debug, Serialize)]
struct OutboundMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Notifier that delivers through an HTTP mail API
#[derive(Debug, Clone)]
pub struct HttpApiMailer {
    http: reqwest::Client,
    config: MailConfig,
}

impl HttpApiMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl DomainPort for HttpApiMailer {}

#[async_trait]
impl Notifier for HttpApiMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), PortError> {
        let mail = OutboundMail {
            from: &self.config.from,
            to,
            subject,
            text: body,
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&mail)
            .send()
            .await
            .map_err(|e| PortError::Connection {
                message: format!("mail API unreachable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::ServiceUnavailable {
                service: format!("mail ({status})"),
            });
        }

        debug!(%to, %subject, "Email sent");
        Ok(())
    }
}

/// Notifier used when mail credentials are missing: logs and skips
#[derive(Debug, Clone, Default)]
pub struct DisabledMailer;

impl DisabledMailer {
    pub fn new() -> Self {
        Self
    }
}

impl DomainPort for DisabledMailer {}

#[async_trait]
impl Notifier for DisabledMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), PortError> {
        info!(%to, %subject, "Email skipped (mail not configured)");
        Ok(())
    }
}
