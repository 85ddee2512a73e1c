//! Loan application DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ApplicationId, UserId};
use domain_loan::{ApplicationSummary, DocumentSet, LoanApplication};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: ApplicationId,
    pub loan_type: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub requested_amount: Decimal,
    pub documents: DocumentSet,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LoanApplication> for ApplicationResponse {
    fn from(application: LoanApplication) -> Self {
        Self {
            id: application.id,
            loan_type: application.loan_type.as_str().to_string(),
            full_name: application.applicant.full_name,
            phone: application.applicant.phone,
            address: application.applicant.address,
            requested_amount: application.applicant.requested_amount,
            documents: application.documents,
            status: application.status.as_str().to_string(),
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminApplicationResponse {
    pub owner: UserId,
    pub applicant_name: String,
    pub applicant_email: String,
    #[serde(flatten)]
    pub application: ApplicationResponse,
}

impl From<ApplicationSummary> for AdminApplicationResponse {
    fn from(summary: ApplicationSummary) -> Self {
        Self {
            owner: summary.application.owner,
            applicant_name: summary.applicant_name,
            applicant_email: summary.applicant_email,
            application: summary.application.into(),
        }
    }
}
