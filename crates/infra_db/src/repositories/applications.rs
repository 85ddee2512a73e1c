//! Loan application repository
//!
//! Database access for the application lifecycle: intake insert, owner and
//! review listings, and the conditional status update that serializes
//! concurrent review decisions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{ApplicationId, DomainPort, PortError, UserId};
use domain_loan::{
    ApplicantDetails, ApplicationStatus, ApplicationStore, ApplicationSummary, DocumentSet,
    LoanApplication, LoanType, NewApplication,
};

use crate::error::DatabaseError;

const APPLICATION_COLUMNS: &str = "id, owner_id, loan_type, full_name, phone, address, \
     requested_amount, documents, status, created_at, updated_at";

/// Repository for loan application data
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Creates a new ApplicationRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a new application in a single insert
    pub async fn create(&self, new: NewApplication) -> Result<LoanApplication, DatabaseError> {
        let application =
            LoanApplication::submit(new.owner, new.loan_type, new.applicant, new.documents);

        let documents = serde_json::to_value(&application.documents)
            .map_err(|e| DatabaseError::CorruptRow(e.to_string()))?;

        let sql = format!(
            "INSERT INTO loan_applications \
             (id, owner_id, loan_type, full_name, phone, address, requested_amount, \
              documents, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {APPLICATION_COLUMNS}"
        );

        let row: ApplicationRow = sqlx::query_as(&sql)
            .bind(application.id.as_uuid())
            .bind(application.owner.as_uuid())
            .bind(application.loan_type.as_str())
            .bind(&application.applicant.full_name)
            .bind(&application.applicant.phone)
            .bind(&application.applicant.address)
            .bind(application.applicant.requested_amount)
            .bind(documents)
            .bind(application.status.as_str())
            .bind(application.created_at)
            .bind(application.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        row.into_domain()
    }

    /// Retrieves an application by its identifier
    pub async fn get_by_id(&self, id: ApplicationId) -> Result<LoanApplication, DatabaseError> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM loan_applications WHERE id = $1");

        let row: Option<ApplicationRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        row.ok_or_else(|| DatabaseError::not_found("LoanApplication", id))?
            .into_domain()
    }

    /// Retrieves an owner's applications, newest first
    pub async fn find_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<LoanApplication>, DatabaseError> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM loan_applications \
             WHERE owner_id = $1 ORDER BY created_at DESC"
        );

        let rows: Vec<ApplicationRow> = sqlx::query_as(&sql)
            .bind(owner.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        rows.into_iter().map(ApplicationRow::into_domain).collect()
    }

    /// Retrieves every application joined with owner identity, newest first
    pub async fn find_all(&self) -> Result<Vec<ApplicationSummary>, DatabaseError> {
        let sql = "SELECT a.id, a.owner_id, a.loan_type, a.full_name, a.phone, a.address, \
             a.requested_amount, a.documents, a.status, a.created_at, a.updated_at, \
             u.name AS applicant_name, u.email AS applicant_email \
             FROM loan_applications a \
             JOIN users u ON u.id = a.owner_id \
             ORDER BY a.created_at DESC";

        let rows: Vec<SummaryRow> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        rows.into_iter()
            .map(|row| {
                Ok(ApplicationSummary {
                    application: row.application.into_domain()?,
                    applicant_name: row.applicant_name,
                    applicant_email: row.applicant_email,
                })
            })
            .collect()
    }

    /// Conditionally moves an application's status
    ///
    /// The `WHERE status = expected` clause makes the update atomic: of two
    /// concurrent decisions, exactly one affects a row.
    pub async fn set_status_if_current(
        &self,
        id: ApplicationId,
        expected: ApplicationStatus,
        new_status: ApplicationStatus,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE loan_applications \
             SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .bind(new_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(result.rows_affected() == 1)
    }
}

impl DomainPort for ApplicationRepository {}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn insert(&self, new: NewApplication) -> Result<LoanApplication, PortError> {
        Ok(self.create(new).await?)
    }

    async fn get(&self, id: ApplicationId) -> Result<LoanApplication, PortError> {
        Ok(self.get_by_id(id).await?)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<LoanApplication>, PortError> {
        Ok(self.find_by_owner(owner).await?)
    }

    async fn list_all(&self) -> Result<Vec<ApplicationSummary>, PortError> {
        Ok(self.find_all().await?)
    }

    async fn update_status_if_current(
        &self,
        id: ApplicationId,
        expected: ApplicationStatus,
        new_status: ApplicationStatus,
    ) -> Result<bool, PortError> {
        Ok(self.set_status_if_current(id, expected, new_status).await?)
    }
}

/// Database row for a loan application
#[derive(Debug, Clone, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    owner_id: Uuid,
    loan_type: String,
    full_name: String,
    phone: String,
    address: String,
    requested_amount: Decimal,
    documents: serde_json::Value,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn into_domain(self) -> Result<LoanApplication, DatabaseError> {
        let loan_type: LoanType = self
            .loan_type
            .parse()
            .map_err(|_| DatabaseError::CorruptRow(format!("loan_type '{}'", self.loan_type)))?;
        let status: ApplicationStatus = self
            .status
            .parse()
            .map_err(|_| DatabaseError::CorruptRow(format!("status '{}'", self.status)))?;
        let documents: DocumentSet = serde_json::from_value(self.documents)
            .map_err(|e| DatabaseError::CorruptRow(format!("documents column: {e}")))?;

        Ok(LoanApplication {
            id: ApplicationId::from_uuid(self.id),
            owner: UserId::from_uuid(self.owner_id),
            loan_type,
            applicant: ApplicantDetails {
                full_name: self.full_name,
                phone: self.phone,
                address: self.address,
                requested_amount: self.requested_amount,
            },
            documents,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for the review listing join
#[derive(Debug, Clone, sqlx::FromRow)]
struct SummaryRow {
    #[sqlx(flatten)]
    application: ApplicationRow,
    applicant_name: String,
    applicant_email: String,
}
