// Certificate expiry checks
//
// One pass over the configured hosts:
// - validates every host entry before probing
// - probes hosts concurrently with a bounded pool and a per-probe deadline
// - collects certificates that expire within the threshold, in configuration order
// - mails a single consolidated report when anything is overdue

pub mod alerts;
pub mod checker;
pub mod config;
pub mod types;

// Re-export commonly used types
pub use alerts::{MailTransport, Notifier, NotifyOutcome, OutgoingMail};
pub use checker::BatchChecker;
pub use config::{EmailTemplate, HostEntry, RunConfiguration, SmtpSecurity, SmtpSettings};
pub use types::{CertificateObservation, CheckReport, HostFailure, HostTarget, OverdueRecord};
