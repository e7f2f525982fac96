// Check run overrides
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Options that adjust a check run on top of the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Report certificates expiring in fewer than DAYS days (overrides config)
    #[arg(long = "threshold", value_name = "DAYS")]
    pub threshold: Option<i64>,

    /// Maximum number of hosts probed at the same time (overrides config)
    #[arg(long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-host probe timeout in seconds (overrides config)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print the report instead of sending it
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with an error when any host check or the notification failed
    #[arg(long = "strict")]
    pub strict: bool,
}
