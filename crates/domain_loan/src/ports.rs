//! Loan Domain Ports
//!
//! Port traits for the collaborators the loan domain needs: the relational
//! store, the blob store for uploaded documents, and the mail sender.
//! Production adapters live in `infra_db`, `infra_storage`, and
//! `infra_notify`; in-memory mock adapters live in `test_utils`.
//!
//! The caller's identity is an explicit [`Actor`] parameter on every
//! operation that needs one - never ambient state - so the services stay
//! deterministic under test.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ApplicationId, DomainPort, PortError, UserId};

use crate::applicant::ApplicantDetails;
use crate::application::{ApplicationStatus, LoanApplication};
use crate::documents::{DocumentSet, LoanType};

/// Role of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = core_kernel::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(core_kernel::CoreError::validation(format!(
                "unknown role '{other}'"
            ))),
        }
    }
}

/// The authenticated identity a core operation runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::User,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data for creating a new application
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub owner: UserId,
    pub loan_type: LoanType,
    pub applicant: ApplicantDetails,
    pub documents: DocumentSet,
}

/// An application joined with its owner's identity, for review listings
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    pub application: LoanApplication,
    pub applicant_name: String,
    pub applicant_email: String,
}

/// Persistence collaborator for loan applications
#[async_trait]
pub trait ApplicationStore: DomainPort {
    /// Persists a new application in one atomic write
    async fn insert(&self, new: NewApplication) -> Result<LoanApplication, PortError>;

    /// Retrieves an application by id
    async fn get(&self, id: ApplicationId) -> Result<LoanApplication, PortError>;

    /// Lists an owner's applications, newest first
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<LoanApplication>, PortError>;

    /// Lists all applications with owner identity, newest first
    async fn list_all(&self) -> Result<Vec<ApplicationSummary>, PortError>;

    /// Conditionally moves `id` from `expected` to `new_status`
    ///
    /// Returns `false` when the application was not in `expected` - the
    /// atomic compare the concurrent-decision property relies on.
    async fn update_status_if_current(
        &self,
        id: ApplicationId,
        expected: ApplicationStatus,
        new_status: ApplicationStatus,
    ) -> Result<bool, PortError>;
}

/// A registered user account
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Data for registering a user account
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Persistence collaborator for user accounts
#[async_trait]
pub trait UserDirectory: DomainPort {
    /// Registers a new account; fails with Conflict on duplicate email
    async fn create(&self, new: NewUserAccount) -> Result<UserAccount, PortError>;

    /// Looks up an account by email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, PortError>;

    /// Returns the registered email for a user id
    async fn email_of(&self, id: UserId) -> Result<String, PortError>;
}

/// An uploaded file, prior to storage
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Reference returned by a blob store; always an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub url: String,
}

/// Blob-storage collaborator for uploaded documents
#[async_trait]
pub trait DocumentStore: DomainPort {
    /// Stores a file under `folder` and returns its retrievable reference
    async fn store(&self, file: UploadFile, folder: &str) -> Result<StoredDocument, PortError>;
}

/// Notification collaborator
///
/// Best-effort: callers log failures and continue. Production wiring puts a
/// queued dispatcher behind this trait so delivery never blocks a request.
#[async_trait]
pub trait Notifier: DomainPort {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), PortError>;
}
