//! Notification message composition
//!
//! Builds the subject and body of the emails the services dispatch. Kept
//! separate from the sending port so message content is testable without a
//! mail collaborator.

use crate::application::{ApplicationStatus, LoanApplication};

/// A composed email, ready for a [`crate::ports::Notifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// Message sent to the owner when intake accepts an application
pub fn submitted(application: &LoanApplication) -> EmailMessage {
    EmailMessage {
        subject: format!("Loan application {} received", application.id),
        body: format!(
            "Dear {},\n\nYour {} loan application for {} has been received and is under review.\n\
             We will notify you once a decision has been made.\n\nApplication id: {}\n",
            application.applicant.full_name,
            application.loan_type,
            application.applicant.requested_amount,
            application.id,
        ),
    }
}

/// Message sent to the owner when a review decision lands
///
/// The subject carries the decision verdict and the application id.
pub fn decision(application: &LoanApplication) -> EmailMessage {
    let verdict = match application.status {
        ApplicationStatus::Approved => "APPROVED",
        ApplicationStatus::Rejected => "REJECTED",
        ApplicationStatus::UnderReview => "UNDER REVIEW",
    };

    EmailMessage {
        subject: format!("Loan application {} {}", application.id, verdict),
        body: format!(
            "Dear {},\n\nYour {} loan application for {} has been {}.\n\nApplication id: {}\n",
            application.applicant.full_name,
            application.loan_type,
            application.applicant.requested_amount,
            verdict.to_lowercase(),
            application.id,
        ),
    }
}
