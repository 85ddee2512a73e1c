//! Queued notification dispatch
//!
//! Hands outbound emails to a background worker over a bounded channel, so
//! the operation that triggered the email returns as soon as the status or
//! application write is durable. Delivery failures are logged by the worker
//! and never reach the caller.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use core_kernel::{DomainPort, PortError};
use domain_loan::Notifier;

#[derive(Debug)]
struct QueuedEmail {
    to: String,
    subject: String,
    body: String,
}

/// Notifier that enqueues sends for a background worker
#[derive(Clone)]
pub struct QueuedNotifier {
    tx: mpsc::Sender<QueuedEmail>,
}

impl QueuedNotifier {
    /// Spawns the dispatch worker and returns the enqueueing notifier
    ///
    /// The worker drains the queue through `inner` and exits once every
    /// `QueuedNotifier` clone has been dropped.
    pub fn spawn(inner: Arc<dyn Notifier>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<QueuedEmail>(capacity);

        tokio::spawn(async move {
            while let Some(email) = rx.recv().await {
                if let Err(error) = inner.send(&email.to, &email.subject, &email.body).await {
                    warn!(to = %email.to, subject = %email.subject, %error, "Email delivery failed");
                }
            }
            info!("Notification worker stopped");
        });

        Self { tx }
    }
}

impl DomainPort for QueuedNotifier {}

#[async_trait]
impl Notifier for QueuedNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), PortError> {
        // Non-blocking: a full queue drops the email rather than stalling
        // the request that triggered it.
        self.tx
            .try_send(QueuedEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            })
            .map_err(|_| PortError::ServiceUnavailable {
                service: "notification queue".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use test_utils::RecordingNotifier;

    #[tokio::test]
    async fn test_enqueued_email_is_delivered() {
        let recorder = Arc::new(RecordingNotifier::new());
        let queued = QueuedNotifier::spawn(recorder.clone(), 8);

        queued
            .send("asha.verma@example.test", "subject", "body")
            .await
            .unwrap();

        // The worker delivers asynchronously; poll briefly.
        for _ in 0..50 {
            if !recorder.sent().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let sent = recorder.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "asha.verma@example.test");
    }

    #[tokio::test]
    async fn test_delivery_failure_stays_inside_the_worker() {
        let recorder = Arc::new(RecordingNotifier::new());
        recorder.set_failing(true);
        let queued = QueuedNotifier::spawn(recorder.clone(), 8);

        // Enqueueing succeeds even though delivery will fail.
        assert!(queued.send("to@example.test", "s", "b").await.is_ok());
    }

    #[tokio::test]
    async fn test_full_queue_reports_unavailable() {
        // A worker that never drains: capacity 1, inner blocked forever.
        struct Stuck;

        impl DomainPort for Stuck {}

        #[async_trait]
        impl Notifier for Stuck {
            async fn send(&self, _: &str, _: &str, _: &str) -> Result<(), PortError> {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }

        let queued = QueuedNotifier::spawn(Arc::new(Stuck), 1);

        // First fills the worker, second fills the queue slot, third drops.
        let mut results = Vec::new();
        for _ in 0..3 {
            results.push(queued.send("to@example.test", "s", "b").await);
        }

        assert!(results.iter().any(|r| r.is_err()));
    }
}
