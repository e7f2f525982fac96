// Certificate probing and expiry evaluation

pub mod expiry;
pub mod prober;

pub use expiry::{days_until_expiry, is_overdue};
pub use prober::{CertificateProbe, TlsProber};
