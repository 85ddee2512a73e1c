//! Loan Application Domain
//!
//! This crate implements the loan application lifecycle from intake through
//! administrator review.
//!
//! # Application Lifecycle
//!
//! ```text
//! Intake (documents validated) -> UnderReview -> Approved / Rejected
//! ```
//!
//! `Approved` and `Rejected` are terminal: repeat decisions fail with
//! `AlreadyFinalized` rather than silently overwriting the outcome.

pub mod application;
pub mod applicant;
pub mod documents;
pub mod intake;
pub mod review;
pub mod notification;
pub mod ports;
pub mod error;

pub use application::{ApplicationStatus, LoanApplication};
pub use applicant::ApplicantDetails;
pub use documents::{validate_documents, DocumentSet, LoanType};
pub use error::LoanError;
pub use intake::{IntakeService, Submission};
pub use notification::EmailMessage;
pub use ports::{
    Actor, ApplicationStore, ApplicationSummary, DocumentStore, NewApplication, NewUserAccount,
    Notifier, Role, StoredDocument, UploadFile, UserAccount, UserDirectory,
};
pub use review::ReviewService;
