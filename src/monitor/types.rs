// Core types for certificate checks

use crate::Result;
use crate::monitor::config::HostEntry;
use crate::error::WatchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Port used when a host entry does not name one
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Validated endpoint to probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTarget {
    pub host: String,
    pub port: u16,
}

impl HostTarget {
    /// Create a target, rejecting empty host names
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        let trimmed = host.trim();

        if trimmed.is_empty() {
            return Err(WatchError::config("no hostname provided"));
        }

        Ok(Self {
            host: trimmed.to_string(),
            port,
        })
    }

    /// Build a target from a raw configuration entry, applying the default port.
    /// The entry itself is left untouched.
    pub fn from_entry(entry: &HostEntry) -> Result<Self> {
        let host = entry.host.as_deref().unwrap_or_default();
        Self::new(host, entry.port.unwrap_or(DEFAULT_TLS_PORT))
    }
}

impl std::fmt::Display for HostTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Validity window read from a peer certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateObservation {
    pub host: String,
    pub port: u16,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub days_remaining: i64,
}

impl CertificateObservation {
    /// Record an observation for `target`, computing days remaining against `now`
    pub fn new(
        target: &HostTarget,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            valid_from,
            valid_to,
            days_remaining: crate::certificates::expiry::days_until_expiry(valid_to, now),
        }
    }

    /// Whether the certificate's not-after lies before `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_to < now
    }
}

impl std::fmt::Display for CertificateObservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Observation retained because it crossed the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueRecord {
    pub host: String,
    pub port: u16,
    pub valid_to: DateTime<Utc>,
    pub days_remaining: i64,
}

impl From<&CertificateObservation> for OverdueRecord {
    fn from(observation: &CertificateObservation) -> Self {
        Self {
            host: observation.host.clone(),
            port: observation.port,
            valid_to: observation.valid_to,
            days_remaining: observation.days_remaining,
        }
    }
}

/// A host whose probe failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFailure {
    pub host: String,
    pub port: u16,
    pub error: String,
}

/// Outcome of one pass over the host list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckReport {
    /// Overdue certificates in configuration order
    pub overdue: Vec<OverdueRecord>,
    /// Hosts that could not be probed, in configuration order
    pub failures: Vec<HostFailure>,
    /// Number of hosts that produced an observation
    pub checked: usize,
}

impl CheckReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
