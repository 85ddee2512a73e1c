//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use std::collections::BTreeMap;

use core_kernel::UserId;
use domain_loan::{ApplicantDetails, DocumentSet, LoanApplication, LoanType, Submission};
use rust_decimal::Decimal;

use crate::fixtures::{ApplicantFixtures, DocumentFixtures, IdFixtures};

/// Builder for intake submissions
pub struct SubmissionBuilder {
    loan_type: String,
    applicant: ApplicantDetails,
    uploads: BTreeMap<String, Option<String>>,
}

impl Default for SubmissionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionBuilder {
    /// Creates a builder for a complete personal-loan submission
    pub fn new() -> Self {
        Self::for_loan_type(LoanType::Personal)
    }

    /// Creates a builder with a complete upload set for `loan_type`
    pub fn for_loan_type(loan_type: LoanType) -> Self {
        Self {
            loan_type: loan_type.as_str().to_string(),
            applicant: ApplicantFixtures::valid(),
            uploads: DocumentFixtures::complete_uploads(loan_type),
        }
    }

    /// Sets a raw loan type string (may be unknown)
    pub fn with_loan_type(mut self, loan_type: impl Into<String>) -> Self {
        self.loan_type = loan_type.into();
        self
    }

    pub fn with_applicant(mut self, applicant: ApplicantDetails) -> Self {
        self.applicant = applicant;
        self
    }

    pub fn with_requested_amount(mut self, amount: Decimal) -> Self {
        self.applicant.requested_amount = amount;
        self
    }

    /// Replaces the upload set wholesale
    pub fn with_uploads(mut self, uploads: BTreeMap<String, Option<String>>) -> Self {
        self.uploads = uploads;
        self
    }

    /// Removes one upload, leaving the slot absent
    pub fn without_upload(mut self, key: &str) -> Self {
        self.uploads.remove(key);
        self
    }

    /// Adds an upload entry (possibly an extra, unrecognized key)
    pub fn with_upload(mut self, key: impl Into<String>, reference: Option<String>) -> Self {
        self.uploads.insert(key.into(), reference);
        self
    }

    pub fn build(self) -> Submission {
        Submission {
            loan_type: self.loan_type,
            applicant: self.applicant,
            uploads: self.uploads,
        }
    }
}

/// Builder for loan application aggregates
pub struct TestApplicationBuilder {
    owner: UserId,
    loan_type: LoanType,
    applicant: ApplicantDetails,
    documents: Option<DocumentSet>,
}

impl Default for TestApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApplicationBuilder {
    pub fn new() -> Self {
        Self {
            owner: IdFixtures::user_id(),
            loan_type: LoanType::Personal,
            applicant: ApplicantFixtures::valid(),
            documents: None,
        }
    }

    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_loan_type(mut self, loan_type: LoanType) -> Self {
        self.loan_type = loan_type;
        self
    }

    pub fn with_applicant(mut self, applicant: ApplicantDetails) -> Self {
        self.applicant = applicant;
        self
    }

    pub fn with_documents(mut self, documents: DocumentSet) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Builds an `UnderReview` application with a complete document set
    pub fn build(self) -> LoanApplication {
        let documents = self
            .documents
            .unwrap_or_else(|| DocumentFixtures::complete_set(self.loan_type));

        LoanApplication::submit(self.owner, self.loan_type, self.applicant, documents)
    }
}
