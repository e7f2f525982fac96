// Batch Checker - probe every configured host and collect overdue certificates

use crate::Result;
use crate::certificates::expiry::is_overdue;
use crate::certificates::prober::CertificateProbe;
use crate::error::{ProbeError, WatchError};
use crate::monitor::config::HostEntry;
use crate::monitor::types::{
    CertificateObservation, CheckReport, HostFailure, HostTarget, OverdueRecord,
};
use chrono::Utc;
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;

/// Runs one pass of certificate probes over a host list
pub struct BatchChecker {
    probe: Arc<dyn CertificateProbe>,
    max_concurrent: usize,
    probe_timeout: Duration,
    verbose: bool,
}

impl BatchChecker {
    /// Create a checker with 4 concurrent probes and a 10s per-probe deadline
    pub fn new(probe: Arc<dyn CertificateProbe>) -> Self {
        Self {
            probe,
            max_concurrent: 4,
            probe_timeout: Duration::from_secs(10),
            verbose: false,
        }
    }

    /// Limit simultaneous probes; 1 checks hosts one after another
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// Print every observation to the console
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Probe `hosts` and return the certificates with fewer than `threshold` days left.
    ///
    /// All entries are validated before the first probe; a missing host name aborts
    /// the run. Probe failures are logged and recorded without stopping the batch.
    /// Dropping the returned future aborts probes still in flight.
    pub async fn run_checks(&self, hosts: &[HostEntry], threshold: i64) -> Result<CheckReport> {
        let targets = hosts
            .iter()
            .map(HostTarget::from_entry)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Checking {} hosts with {} probe (threshold {} days, max {} concurrent)",
            targets.len(),
            self.probe.probe_name(),
            threshold,
            self.max_concurrent
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for (idx, target) in targets.iter().cloned().enumerate() {
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&semaphore);
            let probe_timeout = self.probe_timeout;

            tasks.spawn(async move {
                // Acquire semaphore permit
                let _permit = semaphore.acquire_owned().await.ok();

                let result = match timeout(probe_timeout, probe.probe(&target)).await {
                    Ok(result) => result,
                    Err(_) => Err(WatchError::ConnectionError {
                        host: target.host.clone(),
                        port: target.port,
                        source: ProbeError::Timeout {
                            duration: probe_timeout,
                        },
                    }),
                };

                (idx, result)
            });
        }

        // Slots keep configuration order regardless of completion order
        let mut outcomes: Vec<Option<Result<CertificateObservation>>> =
            targets.iter().map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, result)) => outcomes[idx] = Some(result),
                Err(e) => tracing::error!("Probe task failed: {}", e),
            }
        }

        let mut report = CheckReport::default();

        for (target, outcome) in targets.iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| {
                Err(WatchError::Other("probe task did not complete".to_string()))
            });

            match outcome {
                Ok(observation) => {
                    report.checked += 1;
                    self.report_observation(&observation);

                    if is_overdue(&observation, threshold) {
                        if self.verbose {
                            println!(
                                "{} {} expires in {} days on {}",
                                "[!]".yellow(),
                                observation.to_string().yellow(),
                                observation.days_remaining,
                                observation.valid_to
                            );
                        }
                        report.overdue.push(OverdueRecord::from(&observation));
                    }
                }
                Err(e) => {
                    match e {
                        WatchError::ConnectionError { .. } => tracing::error!("{}", e),
                        _ => tracing::error!("check failed for {}: {}", target, e),
                    }
                    report.failures.push(HostFailure {
                        host: target.host.clone(),
                        port: target.port,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Checked {} hosts: {} overdue, {} failed",
            targets.len(),
            report.overdue.len(),
            report.failures.len()
        );

        Ok(report)
    }

    fn report_observation(&self, observation: &CertificateObservation) {
        let expired = observation.is_expired(Utc::now());

        tracing::debug!(
            host = %observation.host,
            port = observation.port,
            valid_from = %observation.valid_from,
            valid_to = %observation.valid_to,
            days_remaining = observation.days_remaining,
            expired,
            "certificate observed"
        );

        if self.verbose {
            let status = if expired {
                "expired".red()
            } else {
                "valid".green()
            };
            println!(
                "{} {} valid from {} to {} ({} days, {})",
                "[+]".green(),
                observation,
                observation.valid_from,
                observation.valid_to,
                observation.days_remaining,
                status
            );
        }
    }
}
