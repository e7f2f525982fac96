// Notifier - one consolidated report per run

pub mod channels;
pub mod console;
pub mod email;

use crate::Result;
use crate::error::WatchError;
use crate::monitor::config::EmailTemplate;
use crate::monitor::types::OverdueRecord;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use channels::{MailTransport, OutgoingMail};
pub use console::ConsoleTransport;
pub use email::SmtpMailTransport;

/// What `notify` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Nothing was overdue; no mail server was contacted
    Skipped,
    /// One report covering `records` certificates was delivered
    Sent { records: usize },
}

/// Render a timestamp the way OpenSSL prints notAfter, e.g. `Mar  1 12:00:00 2026 GMT`
pub fn format_valid_to(valid_to: &DateTime<Utc>) -> String {
    valid_to.format("%b %e %H:%M:%S %Y GMT").to_string()
}

/// One report line for an overdue certificate
pub fn format_record_line(record: &OverdueRecord) -> String {
    format!(
        "\t- {}:{} in {} days ({})\n",
        record.host,
        record.port,
        record.days_remaining,
        format_valid_to(&record.valid_to)
    )
}

/// Builds the report mail and hands it to a transport
pub struct Notifier {
    template: EmailTemplate,
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(template: EmailTemplate, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            template,
            transport,
        }
    }

    /// Header, one line per record, footer
    pub fn render_report(&self, records: &[OverdueRecord]) -> String {
        let mut body = self.template.header.clone();

        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }

        for record in records {
            body.push_str(&format_record_line(record));
        }

        body.push_str(&self.template.footer);
        body
    }

    fn build_mail(&self, subject: String, text: String) -> OutgoingMail {
        OutgoingMail {
            from: self.template.from_addr.clone(),
            to: self.template.recipients(),
            subject,
            text,
        }
    }

    /// Send one report for `records`; does nothing when the slice is empty
    pub async fn notify(&self, records: &[OverdueRecord]) -> Result<NotifyOutcome> {
        if records.is_empty() {
            tracing::debug!("No overdue certificates, skipping notification");
            return Ok(NotifyOutcome::Skipped);
        }

        tracing::info!(
            "Sending report for {} certificates via {}",
            records.len(),
            self.transport.transport_name()
        );

        let mail = self.build_mail(self.template.subject.clone(), self.render_report(records));
        self.deliver(&mail).await?;

        tracing::info!("Report sent via {}", self.transport.transport_name());

        Ok(NotifyOutcome::Sent {
            records: records.len(),
        })
    }

    /// Send a test message through the configured transport
    pub async fn send_test(&self) -> Result<()> {
        let text = format!(
            "{}This is a test message from certwatch. No certificates were checked.\n{}",
            self.template.header, self.template.footer
        );
        let mail = self.build_mail(format!("[test] {}", self.template.subject), text);

        self.deliver(&mail).await
    }

    async fn deliver(&self, mail: &OutgoingMail) -> Result<()> {
        self.transport.send(mail).await.map_err(|e| match e {
            WatchError::NotificationError { .. } => e,
            other => WatchError::notification(other.to_string()),
        })
    }

    pub fn transport_name(&self) -> &str {
        self.transport.transport_name()
    }

    pub async fn test_connection(&self) -> Result<()> {
        self.transport.test_connection().await
    }
}
