//! Email notification adapters
//!
//! Implementations of the domain's `Notifier` port. Production wiring is a
//! [`QueuedNotifier`] in front of an [`HttpApiMailer`], so request latency
//! never depends on the mail provider. When mail credentials are absent the
//! [`DisabledMailer`] logs and skips every send.

pub mod mailer;
pub mod queue;

pub use mailer::{DisabledMailer, HttpApiMailer, MailConfig};
pub use queue::QueuedNotifier;
