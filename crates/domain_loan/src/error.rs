//! Loan domain errors

use thiserror::Error;

use core_kernel::PortError;

use crate::application::ApplicationStatus;

/// Errors that can occur in the loan domain
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Unknown loan type: {0}")]
    UnknownLoanType(String),

    #[error("Missing required documents: {}", .missing.join(", "))]
    MissingDocuments { missing: Vec<String> },

    #[error("Invalid applicant details: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Operation requires administrator role")]
    Unauthorized,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("Application already finalized as {status}")]
    AlreadyFinalized { status: ApplicationStatus },

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl LoanError {
    /// Returns true if the underlying cause is a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoanError::Storage(e) if e.is_not_found())
    }
}
