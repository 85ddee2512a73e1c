//! Application review state machine
//!
//! Administrator decisions move an application from `UnderReview` to
//! `Approved` or `Rejected`. The status write is a conditional update, so two
//! concurrent decisions on the same application cannot both succeed: the
//! loser observes `AlreadyFinalized`.

use std::sync::Arc;

use tracing::warn;

use core_kernel::ApplicationId;

use crate::application::{ApplicationStatus, LoanApplication};
use crate::error::LoanError;
use crate::notification;
use crate::ports::{Actor, ApplicationStore, ApplicationSummary, Notifier, UserDirectory};

/// Application service for administrator review
pub struct ReviewService {
    store: Arc<dyn ApplicationStore>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl ReviewService {
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            users,
            notifier,
        }
    }

    /// Lists every application with owner identity; administrators only
    pub async fn all_applications(
        &self,
        actor: &Actor,
    ) -> Result<Vec<ApplicationSummary>, LoanError> {
        if !actor.is_admin() {
            return Err(LoanError::Unauthorized);
        }

        Ok(self.store.list_all().await?)
    }

    /// Applies a review decision to an application
    ///
    /// The status change is durable before the notification is attempted;
    /// a notification failure is logged and never propagated.
    pub async fn decide(
        &self,
        actor: &Actor,
        id: ApplicationId,
        decision: ApplicationStatus,
    ) -> Result<LoanApplication, LoanError> {
        if !actor.is_admin() {
            return Err(LoanError::Unauthorized);
        }

        let current = self.store.get(id).await?;

        if !decision.is_decision() {
            return Err(LoanError::InvalidTransition {
                from: current.status,
                to: decision,
            });
        }
        if current.status.is_terminal() {
            return Err(LoanError::AlreadyFinalized {
                status: current.status,
            });
        }

        let won = self
            .store
            .update_status_if_current(id, ApplicationStatus::UnderReview, decision)
            .await?;

        if !won {
            // Lost the race to a concurrent decision; report the status that
            // actually stuck.
            let finalized = self.store.get(id).await?;
            return Err(LoanError::AlreadyFinalized {
                status: finalized.status,
            });
        }

        let application = self.store.get(id).await?;
        self.notify_decision(&application).await;

        Ok(application)
    }

    async fn notify_decision(&self, application: &LoanApplication) {
        let email = match self.users.email_of(application.owner).await {
            Ok(email) => email,
            Err(error) => {
                warn!(
                    application_id = %application.id,
                    %error,
                    "Skipping decision notification: owner email lookup failed"
                );
                return;
            }
        };

        let message = notification::decision(application);
        if let Err(error) = self
            .notifier
            .send(&email, &message.subject, &message.body)
            .await
        {
            warn!(
                application_id = %application.id,
                status = %application.status,
                %error,
                "Decision notification failed"
            );
        }
    }
}
