// TestMailCommand - verify SMTP settings
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::monitor::alerts::SmtpMailTransport;
use crate::monitor::{Notifier, RunConfiguration};
use crate::{Args, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// TestMailCommand connects to the configured SMTP server and sends a test message
pub struct TestMailCommand {
    args: Args,
}

impl TestMailCommand {
    /// Create a new TestMailCommand with the given arguments
    pub fn new(args: Args) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for TestMailCommand {
    async fn execute(&self) -> Result<()> {
        let config = RunConfiguration::from_file(&self.args.config)?;
        let transport = Arc::new(SmtpMailTransport::new(config.smtp.clone()));
        let notifier = Notifier::new(config.email.clone(), transport);

        info!(
            "Testing SMTP server {}:{} ({})",
            config.smtp.host,
            config.smtp.effective_port(),
            config.smtp.security
        );

        println!("\nMail Transport Test:");
        println!("{}", "=".repeat(80));

        let result = match notifier.test_connection().await {
            Ok(()) => notifier.send_test().await,
            Err(e) => Err(e),
        };

        let status = if result.is_ok() { "✓" } else { "✗" };
        let message = result
            .as_ref()
            .map(|_| format!("Test mail sent to {}", config.email.to_addr))
            .unwrap_or_else(|e| format!("Failed: {}", e));
        println!("  {} {} - {}", status, notifier.transport_name(), message);
        println!();

        result
    }

    fn name(&self) -> &'static str {
        "TestMailCommand"
    }
}
