//! Document Set Resolver
//!
//! Determines the required document keys for each loan type and validates a
//! candidate upload set against them. Validation is pure and I/O-free so it
//! can be unit tested without any collaborator.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoanError;

/// Canonical document keys
pub mod keys {
    pub const AADHAAR: &str = "aadhaar";
    pub const PAN: &str = "pan";
    pub const SALARY_SLIP: &str = "salarySlip";
    pub const BANK_STATEMENT: &str = "bankStatement";
    pub const RC: &str = "rc";
    pub const FEE_STRUCTURE: &str = "feeStructure";
    pub const ADMISSION_LETTER: &str = "admissionLetter";
    pub const PROPERTY_DOC: &str = "propertyDoc";
}

/// Loan product type
///
/// The required document set is fixed per type and not user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Vehicle,
    Education,
    House,
    Personal,
}

impl LoanType {
    /// Returns the ordered set of document keys required for this loan type
    pub fn required_documents(&self) -> &'static [&'static str] {
        use keys::*;
        match self {
            LoanType::Vehicle => &[AADHAAR, PAN, SALARY_SLIP, BANK_STATEMENT, RC],
            LoanType::Education => &[
                AADHAAR,
                PAN,
                SALARY_SLIP,
                BANK_STATEMENT,
                FEE_STRUCTURE,
                ADMISSION_LETTER,
            ],
            LoanType::House => &[AADHAAR, PAN, SALARY_SLIP, BANK_STATEMENT, PROPERTY_DOC],
            LoanType::Personal => &[AADHAAR, PAN, SALARY_SLIP, BANK_STATEMENT],
        }
    }

    /// All loan types, in display order
    pub fn all() -> &'static [LoanType] {
        &[
            LoanType::Vehicle,
            LoanType::Education,
            LoanType::House,
            LoanType::Personal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Vehicle => "vehicle",
            LoanType::Education => "education",
            LoanType::House => "house",
            LoanType::Personal => "personal",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanType {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" => Ok(LoanType::Vehicle),
            "education" => Ok(LoanType::Education),
            "house" => Ok(LoanType::House),
            "personal" => Ok(LoanType::Personal),
            other => Err(LoanError::UnknownLoanType(other.to_string())),
        }
    }
}

/// Validates an uploaded key set against the loan type's required set
///
/// Fails with `MissingDocuments` carrying exactly `required - uploaded`,
/// in the required table's order.
pub fn validate_documents<'a, I>(loan_type: LoanType, uploaded: I) -> Result<(), LoanError>
where
    I: IntoIterator<Item = &'a str>,
{
    let uploaded: HashSet<&str> = uploaded.into_iter().collect();
    let missing: Vec<String> = loan_type
        .required_documents()
        .iter()
        .filter(|key| !uploaded.contains(**key))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoanError::MissingDocuments { missing })
    }
}

/// The canonical document record of an application
///
/// Maps document keys to a stored reference (an absolute URL once written by
/// a storage adapter) or `None`. Serialized as a JSON object; `null` values
/// and keys outside the required vocabulary survive a round-trip untouched,
/// but only recognized keys participate in validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSet(BTreeMap<String, Option<String>>);

impl DocumentSet {
    /// Creates an empty document set
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a set with every key required by `loan_type` present but null
    pub fn with_required(loan_type: LoanType) -> Self {
        Self(
            loan_type
                .required_documents()
                .iter()
                .map(|key| (key.to_string(), None))
                .collect(),
        )
    }

    /// Builds the document record from raw upload results
    pub fn from_uploads<I>(uploads: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        Self(uploads.into_iter().collect())
    }

    /// Merges upload results into this set, overwriting existing entries
    pub fn merge<I>(&mut self, uploads: I)
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        for (key, reference) in uploads {
            self.0.insert(key, reference);
        }
    }

    /// Records a stored reference for a key
    pub fn insert(&mut self, key: impl Into<String>, reference: Option<String>) {
        self.0.insert(key.into(), reference);
    }

    /// Returns the entry for a key: `None` if absent, `Some(None)` if null
    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.0.get(key)
    }

    /// Returns the reference stored for a key, if any
    pub fn reference(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|r| r.as_deref())
    }

    /// Keys that carry an actual reference
    pub fn provided_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, reference)| reference.is_some())
            .map(|(key, _)| key.as_str())
    }

    /// All entries, including null ones
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(key, reference)| (key.as_str(), reference.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Option<String>)> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self::from_uploads(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_sets_share_common_core() {
        for loan_type in LoanType::all() {
            let required = loan_type.required_documents();
            assert!(required.contains(&keys::AADHAAR));
            assert!(required.contains(&keys::PAN));
            assert!(required.contains(&keys::SALARY_SLIP));
            assert!(required.contains(&keys::BANK_STATEMENT));
        }
    }

    #[test]
    fn test_loan_type_parse_round_trip() {
        for loan_type in LoanType::all() {
            let parsed: LoanType = loan_type.as_str().parse().unwrap();
            assert_eq!(*loan_type, parsed);
        }
    }

    #[test]
    fn test_unknown_loan_type() {
        let err = "gold".parse::<LoanType>().unwrap_err();
        assert!(matches!(err, LoanError::UnknownLoanType(ref t) if t == "gold"));
    }
}
