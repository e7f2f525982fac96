// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::error::WatchError;
use crate::monitor::RunConfiguration;
use clap::Parser;
use std::path::PathBuf;

mod check_args;

pub use check_args::CheckArgs;

/// certwatch - TLS certificate expiry checker
///
/// Probes every host in the configuration file once, then mails a single report
/// listing the certificates that expire within the threshold.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "certwatch")]
pub struct Args {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short = 'c', long = "config", value_name = "FILE", default_value = "certwatch.toml")]
    pub config: PathBuf,

    /// Print every observation and mail step to the console
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(flatten)]
    pub check: CheckArgs,

    /// Write an example configuration file and exit
    #[arg(long = "config-example", value_name = "FILE")]
    pub config_example: Option<PathBuf>,

    /// Send a test mail with the configured SMTP settings and exit
    #[arg(long = "test-mail")]
    pub test_mail: bool,
}

impl Args {
    /// Reject flag combinations that make no sense together
    pub fn validate(&self) -> Result<()> {
        if self.config_example.is_some() && self.test_mail {
            return Err(WatchError::config(
                "Cannot use --config-example and --test-mail together",
            ));
        }

        if self.test_mail && self.check.dry_run {
            return Err(WatchError::config(
                "--dry-run has no effect with --test-mail",
            ));
        }

        Ok(())
    }

    /// Apply command line overrides to a loaded configuration and re-validate it
    pub fn apply_overrides(&self, mut config: RunConfiguration) -> Result<RunConfiguration> {
        config.verbose |= self.verbose;

        if let Some(threshold) = self.check.threshold {
            config.threshold = threshold;
        }
        if let Some(concurrency) = self.check.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = self.check.timeout {
            config.timeout_seconds = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}
