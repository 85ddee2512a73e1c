//! Applicant details and intake validation
//!
//! Validation rules:
//! - full name, phone, and address must be non-empty
//! - requested amount must be strictly positive
//!
//! All failures for a submission are collected and reported together.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;

/// Applicant-supplied details of a loan application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDetails {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub requested_amount: Decimal,
}

impl ApplicantDetails {
    pub fn new(
        full_name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        requested_amount: Decimal,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            phone: phone.into(),
            address: address.into(),
            requested_amount,
        }
    }

    /// Validates the details, collecting every violation
    pub fn validate(&self) -> Result<(), LoanError> {
        let mut errors = Vec::new();

        if self.full_name.trim().is_empty() {
            errors.push("full name must not be empty".to_string());
        }
        if self.phone.trim().is_empty() {
            errors.push("phone must not be empty".to_string());
        }
        if self.address.trim().is_empty() {
            errors.push("address must not be empty".to_string());
        }
        if self.requested_amount <= Decimal::ZERO {
            errors.push(format!(
                "requested amount must be positive, got {}",
                self.requested_amount
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LoanError::Validation { errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_details() -> ApplicantDetails {
        ApplicantDetails::new("Asha Verma", "+91-9876543210", "12 MG Road, Pune", dec!(250000))
    }

    #[test]
    fn test_valid_details() {
        assert!(valid_details().validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut details = valid_details();
        details.full_name = "   ".to_string();

        let err = details.validate().unwrap_err();
        match err {
            LoanError::Validation { errors } => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("full name"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut details = valid_details();
        details.requested_amount = Decimal::ZERO;
        assert!(details.validate().is_err());

        details.requested_amount = dec!(-100);
        assert!(details.validate().is_err());
    }

    #[test]
    fn test_all_violations_collected() {
        let details = ApplicantDetails::new("", "", "", Decimal::ZERO);

        match details.validate().unwrap_err() {
            LoanError::Validation { errors } => assert_eq!(errors.len(), 4),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
