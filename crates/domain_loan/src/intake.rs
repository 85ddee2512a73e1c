//! Application Intake
//!
//! Accepts applicant-submitted fields plus resolved upload references,
//! validates them, and persists the application. The caller receives success
//! once persistence succeeds; the "submitted" email is best-effort and never
//! fails the intake.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use core_kernel::ApplicationId;

use crate::applicant::ApplicantDetails;
use crate::application::LoanApplication;
use crate::documents::{validate_documents, DocumentSet, LoanType};
use crate::error::LoanError;
use crate::notification;
use crate::ports::{Actor, ApplicationStore, NewApplication, Notifier, UserDirectory};

/// A raw intake submission
///
/// `uploads` maps document keys to the reference the blob store returned, or
/// `None` for a declared-but-absent slot. The loan type arrives as the
/// client-supplied string; parsing it is where `UnknownLoanType` surfaces.
#[derive(Debug, Clone)]
pub struct Submission {
    pub loan_type: String,
    pub applicant: ApplicantDetails,
    pub uploads: BTreeMap<String, Option<String>>,
}

/// Application service for loan intake and applicant-facing reads
pub struct IntakeService {
    store: Arc<dyn ApplicationStore>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl IntakeService {
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

    /// Validates and persists a new application
    ///
    /// Nothing is persisted on any validation failure. The owner is taken
    /// from `actor`, never from the submission.
    pub async fn submit(
        &self,
        actor: &Actor,
        submission: Submission,
    ) -> Result<LoanApplication, LoanError> {
        let loan_type: LoanType = submission.loan_type.parse()?;

        submission.applicant.validate()?;

        // Every required key gets an entry; uploads fill the provided ones
        // and may carry extra keys, which are preserved but not validated.
        let mut documents = DocumentSet::with_required(loan_type);
        documents.merge(submission.uploads);

        validate_documents(loan_type, documents.provided_keys())?;

        let application = self
            .store
            .insert(NewApplication {
                owner: actor.user_id,
                loan_type,
                applicant: submission.applicant,
                documents,
            })
            .await?;

        self.notify_submitted(&application).await;

        Ok(application)
    }

    /// Lists the caller's applications, newest first
    pub async fn my_applications(
        &self,
        actor: &Actor,
    ) -> Result<Vec<LoanApplication>, LoanError> {
        Ok(self.store.list_by_owner(actor.user_id).await?)
    }

    /// Retrieves one application; only the owner or an administrator may read
    pub async fn application(
        &self,
        actor: &Actor,
        id: ApplicationId,
    ) -> Result<LoanApplication, LoanError> {
        let application = self.store.get(id).await?;

        if application.owner != actor.user_id && !actor.is_admin() {
            return Err(LoanError::Unauthorized);
        }

        Ok(application)
    }

    async fn notify_submitted(&self, application: &LoanApplication) {
        let email = match self.users.email_of(application.owner).await {
            Ok(email) => email,
            Err(error) => {
                warn!(
                    application_id = %application.id,
                    %error,
                    "Skipping submitted notification: owner email lookup failed"
                );
                return;
            }
        };

        let message = notification::submitted(application);
        if let Err(error) = self
            .notifier
            .send(&email, &message.subject, &message.body)
            .await
        {
            warn!(
                application_id = %application.id,
                %error,
                "Submitted notification failed"
            );
        }
    }
}
