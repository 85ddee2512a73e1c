//! Loan application aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ApplicationId, UserId};

use crate::applicant::ApplicantDetails;
use crate::documents::{DocumentSet, LoanType};
use crate::error::LoanError;

/// Application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted and awaiting an administrator decision
    UnderReview,
    /// Approved by an administrator (terminal)
    Approved,
    /// Rejected by an administrator (terminal)
    Rejected,
}

impl ApplicationStatus {
    /// Returns true if no further transition is permitted
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    /// Returns true if this status is a valid review decision
    pub fn is_decision(&self) -> bool {
        self.is_terminal()
    }

    /// Checks if a transition to `target` is valid
    pub fn can_transition_to(&self, target: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, target),
            (UnderReview, Approved) | (UnderReview, Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = core_kernel::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "under_review" => Ok(ApplicationStatus::UnderReview),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(core_kernel::CoreError::validation(format!(
                "unknown application status '{other}'"
            ))),
        }
    }
}

/// A loan application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanApplication {
    /// Unique identifier
    pub id: ApplicationId,
    /// Submitting user; immutable after creation
    pub owner: UserId,
    /// Loan product applied for
    pub loan_type: LoanType,
    /// Applicant-supplied details
    pub applicant: ApplicantDetails,
    /// Document record, one entry per required key
    pub documents: DocumentSet,
    /// Status
    pub status: ApplicationStatus,
    /// Created timestamp; immutable
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl LoanApplication {
    /// Creates a new application in the initial `UnderReview` state
    pub fn submit(
        owner: UserId,
        loan_type: LoanType,
        applicant: ApplicantDetails,
        documents: DocumentSet,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: ApplicationId::new_v7(),
            owner,
            loan_type,
            applicant,
            documents,
            status: ApplicationStatus::UnderReview,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a review decision
    ///
    /// The decision must be `Approved` or `Rejected`; anything else is an
    /// invalid transition. A terminal application rejects repeat decisions
    /// with `AlreadyFinalized` - there is no idempotent overwrite.
    pub fn finalize(&mut self, decision: ApplicationStatus) -> Result<(), LoanError> {
        if !decision.is_decision() {
            return Err(LoanError::InvalidTransition {
                from: self.status,
                to: decision,
            });
        }
        if self.status.is_terminal() {
            return Err(LoanError::AlreadyFinalized {
                status: self.status,
            });
        }
        debug_assert!(self.status.can_transition_to(decision));

        self.status = decision;
        self.updated_at = Utc::now();
        Ok(())
    }
}
