// CheckCommand - one certificate expiry pass
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::certificates::TlsProber;
use crate::error::WatchError;
use crate::monitor::alerts::{ConsoleTransport, MailTransport, SmtpMailTransport};
use crate::monitor::{BatchChecker, CheckReport, Notifier, NotifyOutcome, RunConfiguration};
use crate::utils::shutdown::shutdown_signal;
use crate::{Args, Result};
use async_trait::async_trait;
use colored::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// What a completed pass produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: CheckReport,
    /// Set when the notifier ran without error
    pub notified: Option<NotifyOutcome>,
    /// Set when building or sending the report failed
    pub notification_error: Option<String>,
}

impl RunSummary {
    /// No host failed and the notification step (if any) succeeded
    pub fn is_clean(&self) -> bool {
        !self.report.has_failures() && self.notification_error.is_none()
    }

    fn failure_message(&self) -> String {
        let mut parts = Vec::new();
        if self.report.has_failures() {
            parts.push(format!("{} host check(s) failed", self.report.failures.len()));
        }
        if let Some(ref e) = self.notification_error {
            parts.push(format!("notification failed ({})", e));
        }
        parts.join(", ")
    }
}

/// Check every host, then notify once.
///
/// If `shutdown` resolves while checks are still running, probes are abandoned
/// and no mail is sent. If it resolves while the report is being delivered, the
/// run returns immediately; the SMTP exchange may still complete in the background.
pub async fn run_pass<F>(
    checker: &BatchChecker,
    notifier: &Notifier,
    config: &RunConfiguration,
    shutdown: F,
) -> Result<RunSummary>
where
    F: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);

    let report = tokio::select! {
        report = checker.run_checks(&config.hosts, config.threshold) => report?,
        signal = &mut shutdown => {
            tracing::warn!("Received {}, abandoning run without sending a report", signal);
            return Err(WatchError::Cancelled);
        }
    };

    if config.verbose && !report.overdue.is_empty() {
        println!("{} Sending mail", "[+]".green());
    }

    let delivery = tokio::select! {
        delivery = notifier.notify(&report.overdue) => delivery,
        signal = &mut shutdown => {
            tracing::warn!("Received {} while sending the report, exiting", signal);
            return Err(WatchError::Cancelled);
        }
    };

    let (notified, notification_error) = match delivery {
        Ok(outcome) => {
            if config.verbose && matches!(outcome, NotifyOutcome::Sent { .. }) {
                println!("{} Sent mail successfully", "[+]".green());
            }
            (Some(outcome), None)
        }
        Err(e) => {
            tracing::error!("{}", e);
            (None, Some(e.to_string()))
        }
    };

    Ok(RunSummary {
        report,
        notified,
        notification_error,
    })
}

/// CheckCommand runs a single expiry pass
///
/// This command is responsible for:
/// - Loading and validating the run configuration
/// - Probing every configured host
/// - Mailing (or printing, with --dry-run) the consolidated report
pub struct CheckCommand {
    args: Args,
}

impl CheckCommand {
    /// Create a new CheckCommand with the given arguments
    pub fn new(args: Args) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self) -> Result<()> {
        let config = RunConfiguration::from_file(&self.args.config)?;
        let config = self.args.apply_overrides(config)?;

        info!(
            "Loaded {} hosts from {}",
            config.hosts.len(),
            self.args.config.display()
        );

        let probe_timeout = Duration::from_secs(config.timeout_seconds);
        let prober = TlsProber::new()?.with_timeout(probe_timeout);
        let checker = BatchChecker::new(Arc::new(prober))
            .with_concurrency(config.concurrency)
            .with_timeout(probe_timeout)
            .with_verbose(config.verbose);

        let transport: Arc<dyn MailTransport> = if self.args.check.dry_run {
            Arc::new(ConsoleTransport)
        } else {
            Arc::new(SmtpMailTransport::new(config.smtp.clone()))
        };
        let notifier = Notifier::new(config.email.clone(), transport);

        let summary = run_pass(&checker, &notifier, &config, shutdown_signal()).await?;

        info!(
            "Run complete: {} checked, {} overdue, {} failed",
            summary.report.checked,
            summary.report.overdue.len(),
            summary.report.failures.len()
        );

        if self.args.check.strict && !summary.is_clean() {
            return Err(WatchError::RunFailed {
                message: summary.failure_message(),
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "CheckCommand"
    }
}
