// Command trait - Defines the interface for all command implementations
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use async_trait::async_trait;

/// Command trait - one operational mode of certwatch
///
/// Each command validates its own preconditions, runs its logic and returns a
/// Result; `main` only routes and maps errors to the exit status.
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute the command asynchronously
    ///
    /// # Errors
    /// Fatal conditions are returned as [`crate::WatchError`]; per-host and
    /// notification failures are logged and only surface in strict mode.
    async fn execute(&self) -> Result<()>;

    /// Get a human-readable name for this command (for logging/debugging)
    fn name(&self) -> &'static str;
}
