//! In-memory mock adapters for the domain ports
//!
//! These are the mock implementations the port architecture calls for:
//! fully functional, no I/O, and with failure injection for exercising the
//! error paths. The application store serializes its conditional status
//! update under one lock, giving tests the same atomic compare-and-set
//! semantics the database adapter provides.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use core_kernel::{ApplicationId, DomainPort, PortError, UserId};
use domain_loan::{
    ApplicationStatus, ApplicationStore, ApplicationSummary, DocumentStore, LoanApplication,
    NewApplication, NewUserAccount, Notifier, Role, StoredDocument, UploadFile, UserAccount,
    UserDirectory,
};

/// In-memory application store
#[derive(Default)]
pub struct InMemoryApplicationStore {
    applications: Mutex<HashMap<ApplicationId, LoanApplication>>,
    owners: Mutex<HashMap<UserId, (String, String)>>,
    fail: AtomicBool,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers owner identity for `list_all` joins
    pub fn register_owner(&self, owner: UserId, name: impl Into<String>, email: impl Into<String>) {
        self.owners
            .lock()
            .unwrap()
            .insert(owner, (name.into(), email.into()));
    }

    /// Makes every subsequent operation fail with a connection error
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of persisted applications
    pub fn len(&self) -> usize {
        self.applications.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct insert of a pre-built aggregate, bypassing the port
    pub fn seed(&self, application: LoanApplication) {
        self.applications
            .lock()
            .unwrap()
            .insert(application.id, application);
    }

    fn check_available(&self) -> Result<(), PortError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(PortError::connection("in-memory store set to fail"))
        } else {
            Ok(())
        }
    }
}

impl DomainPort for InMemoryApplicationStore {}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn insert(&self, new: NewApplication) -> Result<LoanApplication, PortError> {
        self.check_available()?;

        let application =
            LoanApplication::submit(new.owner, new.loan_type, new.applicant, new.documents);
        self.applications
            .lock()
            .unwrap()
            .insert(application.id, application.clone());

        Ok(application)
    }

    async fn get(&self, id: ApplicationId) -> Result<LoanApplication, PortError> {
        self.check_available()?;

        self.applications
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("LoanApplication", id))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<LoanApplication>, PortError> {
        self.check_available()?;

        let mut applications: Vec<LoanApplication> = self
            .applications
            .lock()
            .unwrap()
            .values()
            .filter(|app| app.owner == owner)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(applications)
    }

    async fn list_all(&self) -> Result<Vec<ApplicationSummary>, PortError> {
        self.check_available()?;

        let owners = self.owners.lock().unwrap().clone();
        let mut applications: Vec<LoanApplication> = self
            .applications
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(applications
            .into_iter()
            .map(|application| {
                let (name, email) = owners
                    .get(&application.owner)
                    .cloned()
                    .unwrap_or_else(|| ("unknown".to_string(), "unknown".to_string()));
                ApplicationSummary {
                    application,
                    applicant_name: name,
                    applicant_email: email,
                }
            })
            .collect())
    }

    async fn update_status_if_current(
        &self,
        id: ApplicationId,
        expected: ApplicationStatus,
        new_status: ApplicationStatus,
    ) -> Result<bool, PortError> {
        self.check_available()?;

        let mut applications = self.applications.lock().unwrap();
        let application = applications
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("LoanApplication", id))?;

        if application.status != expected {
            return Ok(false);
        }

        application.status = new_status;
        application.updated_at = Utc::now();
        Ok(true)
    }
}

/// In-memory user directory
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account directly, returning its id
    pub fn add_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> UserId {
        let account = UserAccount {
            id: UserId::new_v7(),
            name: name.into(),
            email: email.into(),
            password_hash: "$2b$12$test-hash".to_string(),
            role,
            created_at: Utc::now(),
        };
        let id = account.id;
        self.users.lock().unwrap().insert(id, account);
        id
    }
}

impl DomainPort for InMemoryUserDirectory {}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn create(&self, new: NewUserAccount) -> Result<UserAccount, PortError> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.email == new.email) {
            return Err(PortError::conflict(format!(
                "user with email '{}' already exists",
                new.email
            )));
        }

        let account = UserAccount {
            id: UserId::new_v7(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };
        users.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, PortError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn email_of(&self, id: UserId) -> Result<String, PortError> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|u| u.email.clone())
            .ok_or_else(|| PortError::not_found("UserAccount", id))
    }
}

/// A captured outbound email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that records every send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// All emails captured so far
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl DomainPort for RecordingNotifier {}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), PortError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::ServiceUnavailable {
                service: "mail".to_string(),
            });
        }

        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Blob store that fabricates deterministic URLs
#[derive(Default)]
pub struct InMemoryDocumentStore {
    stored: Mutex<Vec<(String, String)>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// (folder, file name) pairs stored so far
    pub fn stored(&self) -> Vec<(String, String)> {
        self.stored.lock().unwrap().clone()
    }
}

impl DomainPort for InMemoryDocumentStore {}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn store(&self, file: UploadFile, folder: &str) -> Result<StoredDocument, PortError> {
        self.stored
            .lock()
            .unwrap()
            .push((folder.to_string(), file.file_name.clone()));

        Ok(StoredDocument {
            url: format!("https://cdn.example.test/{}/{}", folder, file.file_name),
        })
    }
}
