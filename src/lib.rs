// certwatch - TLS certificate expiry checker
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! certwatch connects to a list of TLS endpoints, reads the certificate each one
//! presents and mails a single report listing every certificate that expires within
//! a configured number of days.

pub mod certificates;
pub mod cli;
pub mod commands;
pub mod error;
pub mod monitor;
pub mod utils;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::error::{ProbeError, WatchError};
pub use crate::monitor::{BatchChecker, Notifier, RunConfiguration};

/// Result type for certwatch operations
pub type Result<T> = std::result::Result<T, WatchError>;
