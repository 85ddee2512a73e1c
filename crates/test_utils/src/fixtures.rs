//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the loan origination test suite, designed to
//! be consistent and predictable across tests.

use std::collections::BTreeMap;

use core_kernel::{ApplicationId, UserId};
use domain_loan::{ApplicantDetails, DocumentSet, LoanType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for applicant details
pub struct ApplicantFixtures;

impl ApplicantFixtures {
    /// A complete, valid applicant
    pub fn valid() -> ApplicantDetails {
        ApplicantDetails::new(
            "Asha Verma",
            "+91-9876543210",
            "12 MG Road, Pune 411001",
            dec!(250000),
        )
    }

    /// An applicant with every field malformed
    pub fn invalid() -> ApplicantDetails {
        ApplicantDetails::new("", " ", "", Decimal::ZERO)
    }

    /// A standard requested amount
    pub fn amount() -> Decimal {
        dec!(250000)
    }
}

/// Fixture for document upload sets
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// A fake stored reference for a document key
    pub fn url(key: &str) -> String {
        format!("https://cdn.example.test/loan-documents/{key}.pdf")
    }

    /// Upload results covering every key required by `loan_type`
    pub fn complete_uploads(loan_type: LoanType) -> BTreeMap<String, Option<String>> {
        loan_type
            .required_documents()
            .iter()
            .map(|key| (key.to_string(), Some(Self::url(key))))
            .collect()
    }

    /// Upload results with the given keys left out
    pub fn uploads_missing(
        loan_type: LoanType,
        missing: &[&str],
    ) -> BTreeMap<String, Option<String>> {
        loan_type
            .required_documents()
            .iter()
            .filter(|key| !missing.contains(*key))
            .map(|key| (key.to_string(), Some(Self::url(key))))
            .collect()
    }

    /// A fully-populated document record for `loan_type`
    pub fn complete_set(loan_type: LoanType) -> DocumentSet {
        DocumentSet::from_uploads(Self::complete_uploads(loan_type))
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn application_id() -> ApplicationId {
        ApplicationId::new_v7()
    }

    pub fn user_id() -> UserId {
        UserId::new_v7()
    }
}

/// Fixture for user account data
pub struct AccountFixtures;

impl AccountFixtures {
    pub fn email() -> &'static str {
        "asha.verma@example.test"
    }

    pub fn admin_email() -> &'static str {
        "reviewer@example.test"
    }
}
